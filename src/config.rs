//! Pricing configuration and JSON persistence
//!
//! [`Config`] is the persistence collaborator for model pricing: it holds
//! per-provider pricing tables, ships process-wide defaults, and can be
//! loaded from / saved to a JSON file. Providers seed their own tables
//! from it at construction.

use crate::error::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Pricing information for a specific model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Cost per input token
    pub input_price_per_token: f64,
    /// Cost per output token
    pub output_price_per_token: f64,
    /// ISO 4217 currency code
    pub currency: String,
}

impl ModelPricing {
    /// Create a pricing entry
    #[must_use]
    pub fn new(input_price_per_token: f64, output_price_per_token: f64) -> Self {
        Self {
            input_price_per_token,
            output_price_per_token,
            currency: "USD".to_string(),
        }
    }
}

/// Configuration for a single provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Pricing keyed by model name
    pub models: HashMap<String, ModelPricing>,
}

/// Serialized form of the configuration
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    providers: HashMap<String, ProviderConfig>,
}

/// Pricing configuration for the token tracker
///
/// Thread-safe: lookups take a read lock, updates a write lock.
#[derive(Debug)]
pub struct Config {
    providers: RwLock<HashMap<String, ProviderConfig>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a configuration with default pricing for the built-in providers
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(default_providers()),
        }
    }

    /// Create an empty configuration with no pricing entries
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Get pricing for a specific (provider, model) pair
    #[must_use]
    pub fn model_pricing(&self, provider: &str, model: &str) -> Option<ModelPricing> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers
            .get(provider)
            .and_then(|p| p.models.get(model))
            .cloned()
    }

    /// Set pricing for a specific (provider, model) pair
    pub fn set_model_pricing(&self, provider: &str, model: &str, pricing: ModelPricing) {
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers
            .entry(provider.to_string())
            .or_default()
            .models
            .insert(model.to_string(), pricing);
    }

    /// Replace a provider's pricing table wholesale
    pub fn set_provider_pricing(&self, provider: &str, models: HashMap<String, ModelPricing>) {
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers.insert(provider.to_string(), ProviderConfig { models });
    }

    /// Snapshot of a provider's pricing table
    #[must_use]
    pub fn provider_pricing(&self, provider: &str) -> Option<HashMap<String, ModelPricing>> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers.get(provider).map(|p| p.models.clone())
    }

    /// Load configuration from a JSON file, replacing the current tables
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidParams,
                format!("failed to read config file: {}", path.as_ref().display()),
                e,
            )
        })?;

        let file: ConfigFile = serde_json::from_str(&data).map_err(|e| {
            Error::with_source(ErrorKind::InvalidParams, "failed to parse config file", e)
        })?;

        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        *providers = file.providers;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = {
            let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
            providers.clone()
        };

        let file = ConfigFile {
            providers: snapshot,
        };
        let data = serde_json::to_string_pretty(&file).map_err(|e| {
            Error::with_source(ErrorKind::InvalidParams, "failed to serialize config", e)
        })?;

        std::fs::write(path.as_ref(), data).map_err(|e| {
            Error::with_source(
                ErrorKind::InvalidParams,
                format!("failed to write config file: {}", path.as_ref().display()),
                e,
            )
        })
    }
}

/// Default pricing tables for the built-in providers
fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();

    let mut openai = HashMap::new();
    openai.insert(
        "gpt-3.5-turbo".to_string(),
        ModelPricing::new(0.000_001_5, 0.000_002),
    );
    openai.insert(
        "gpt-4".to_string(),
        ModelPricing::new(0.000_03, 0.000_06),
    );
    openai.insert(
        "gpt-4-turbo".to_string(),
        ModelPricing::new(0.000_01, 0.000_03),
    );
    providers.insert("openai".to_string(), ProviderConfig { models: openai });

    let mut anthropic = HashMap::new();
    anthropic.insert(
        "claude-3-haiku".to_string(),
        ModelPricing::new(0.000_000_25, 0.000_001_25),
    );
    anthropic.insert(
        "claude-3-sonnet".to_string(),
        ModelPricing::new(0.000_003, 0.000_015),
    );
    anthropic.insert(
        "claude-3-opus".to_string(),
        ModelPricing::new(0.000_01, 0.000_03),
    );
    providers.insert(
        "anthropic".to_string(),
        ProviderConfig { models: anthropic },
    );

    let mut gemini = HashMap::new();
    gemini.insert(
        "gemini-pro".to_string(),
        ModelPricing::new(0.000_000_25, 0.000_000_5),
    );
    gemini.insert(
        "gemini-ultra".to_string(),
        ModelPricing::new(0.000_01, 0.000_03),
    );
    providers.insert("gemini".to_string(), ProviderConfig { models: gemini });

    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_builtin_models() {
        let config = Config::new();

        assert!(config.model_pricing("openai", "gpt-4").is_some());
        assert!(config.model_pricing("openai", "gpt-3.5-turbo").is_some());
        assert!(config.model_pricing("anthropic", "claude-3-opus").is_some());
        assert!(config.model_pricing("gemini", "gemini-pro").is_some());

        assert!(config.model_pricing("openai", "unknown-model").is_none());
        assert!(config.model_pricing("unknown-provider", "gpt-4").is_none());
    }

    #[test]
    fn test_gpt4_default_pricing() {
        let config = Config::new();
        let pricing = config.model_pricing("openai", "gpt-4").unwrap();
        assert!((pricing.input_price_per_token - 0.00003).abs() < 1e-12);
        assert!((pricing.output_price_per_token - 0.00006).abs() < 1e-12);
        assert_eq!(pricing.currency, "USD");
    }

    #[test]
    fn test_set_model_pricing_creates_provider() {
        let config = Config::empty();
        assert!(config.model_pricing("local", "llama").is_none());

        config.set_model_pricing("local", "llama", ModelPricing::new(0.0, 0.0));
        let pricing = config.model_pricing("local", "llama").unwrap();
        assert_eq!(pricing.input_price_per_token, 0.0);
    }

    #[test]
    fn test_set_provider_pricing_replaces_wholesale() {
        let config = Config::new();
        let mut models = HashMap::new();
        models.insert("gpt-4".to_string(), ModelPricing::new(0.1, 0.2));
        config.set_provider_pricing("openai", models);

        // gpt-3.5-turbo was dropped by the wholesale replace
        assert!(config.model_pricing("openai", "gpt-3.5-turbo").is_none());
        let pricing = config.model_pricing("openai", "gpt-4").unwrap();
        assert!((pricing.input_price_per_token - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        let config = Config::new();
        config.set_model_pricing("openai", "gpt-4o", ModelPricing::new(0.000_005, 0.000_015));
        config.save_to_file(&path).unwrap();

        let loaded = Config::empty();
        loaded.load_from_file(&path).unwrap();

        let pricing = loaded.model_pricing("openai", "gpt-4o").unwrap();
        assert!((pricing.input_price_per_token - 0.000_005).abs() < 1e-12);
        assert!(loaded.model_pricing("anthropic", "claude-3-opus").is_some());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let config = Config::empty();
        let err = config.load_from_file("/nonexistent/pricing.json").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidParams);
        assert!(std::error::Error::source(&err).is_some());
    }
}
