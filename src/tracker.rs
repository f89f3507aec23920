//! Token tracker orchestration
//!
//! [`TokenTracker`] is the single entry point callers use: it resolves
//! models to providers through the registry and runs the count → price →
//! assemble-metrics pipeline. It is also the composition root that owns
//! the shared pricing configuration and the injected token cache.

use crate::cache::TokenCache;
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::params::{CallParams, TokenCountParams};
use crate::provider::{
    CompletionTokens, Provider, VendorProfile, VendorProvider, VendorResponse,
};
use crate::registry::ProviderRegistry;
use crate::sdk::SdkClientWrapper;
use crate::types::{Price, TokenCount, UsageMetrics};
use chrono::Utc;
use std::sync::Arc;

/// Orchestrator for token counting, pricing and usage tracking
pub struct TokenTracker {
    registry: ProviderRegistry,
    config: Arc<Config>,
    cache: Arc<TokenCache>,
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new(Arc::new(Config::new()))
    }
}

impl TokenTracker {
    /// Create a tracker with an empty registry
    ///
    /// Call [`register_defaults`](Self::register_defaults) or
    /// [`register_provider`](Self::register_provider) before counting.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            config,
            cache: Arc::new(TokenCache::default()),
        }
    }

    /// Use a specific token cache instead of the default-sized one
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Register the built-in OpenAI, Anthropic and Gemini providers
    ///
    /// Providers are seeded from this tracker's pricing configuration
    /// and share its token cache.
    pub fn register_defaults(&self) {
        for profile in [
            VendorProfile::openai(),
            VendorProfile::anthropic(),
            VendorProfile::gemini(),
        ] {
            let provider = VendorProvider::from_config(profile, &self.config)
                .with_cache(Arc::clone(&self.cache));
            self.registry.register(Arc::new(provider));
        }
    }

    /// Register a provider
    pub fn register_provider(&self, provider: Arc<dyn Provider>) {
        self.registry.register(provider);
    }

    /// The provider registry
    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The shared pricing configuration
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The shared token cache
    #[must_use]
    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Count tokens for the given parameters
    pub fn count_tokens(&self, params: &TokenCountParams) -> Result<TokenCount> {
        if params.model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }

        let provider = self.registry.get_for_model(&params.model).ok_or_else(|| {
            Error::provider_not_found(format!("no provider found for model: {}", params.model))
        })?;

        provider.count_tokens(params)
    }

    /// Calculate price based on token usage
    pub fn calculate_price(
        &self,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<Price> {
        if model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }

        let provider = self.registry.get_for_model(model).ok_or_else(|| {
            Error::provider_not_found(format!("no provider found for model: {model}"))
        })?;

        provider.calculate_price(model, input_tokens, output_tokens)
    }

    /// Track full usage for an LLM call
    ///
    /// When `response` carries a completion token count it is used
    /// directly; otherwise the output is estimated by re-counting with
    /// response estimation enabled. A failure in that estimation path is
    /// logged and swallowed, leaving the output count at 0.
    pub fn track_usage(
        &self,
        call: &CallParams,
        response: Option<&dyn CompletionTokens>,
    ) -> Result<UsageMetrics> {
        let input_count = self.count_tokens(&call.params)?;

        let output_tokens = match response.and_then(CompletionTokens::completion_tokens) {
            Some(tokens) => tokens,
            None => self.estimate_output_tokens(call),
        };

        let price = self.calculate_price(&call.model, input_count.input_tokens, output_tokens)?;

        let duration = call.start_time.elapsed();

        // Resolution is re-run here; the model→provider mapping is
        // stable within a process
        let provider = self.registry.get_for_model(&call.model).ok_or_else(|| {
            Error::provider_not_found(format!("no provider found for model: {}", call.model))
        })?;

        Ok(UsageMetrics {
            token_count: TokenCount::new(input_count.input_tokens, output_tokens),
            price,
            duration,
            timestamp: Utc::now(),
            model: call.model.clone(),
            provider: provider.name().to_string(),
        })
    }

    /// Estimate output tokens for a call whose response carried no count
    fn estimate_output_tokens(&self, call: &CallParams) -> u32 {
        let Some(provider) = self.registry.get_for_model(&call.model) else {
            return 0;
        };

        let mut estimate_params = call.params.clone();
        estimate_params.count_response_tokens = true;

        match provider.count_tokens(&estimate_params) {
            Ok(estimate) => estimate.response_tokens,
            Err(err) => {
                tracing::debug!(
                    model = %call.model,
                    error = %err,
                    "output token estimation failed, defaulting to 0"
                );
                0
            }
        }
    }

    /// Register an SDK client with the provider it names
    ///
    /// Stores the raw client handle in the provider, then asks the
    /// wrapper to push fresh pricing; a pricing failure surfaces as
    /// `PricingUpdateFailed`.
    pub fn register_sdk_client(&self, client: &dyn SdkClientWrapper) -> Result<()> {
        let provider_name = client.provider_name();
        let provider = self.registry.get(&provider_name).ok_or_else(|| {
            Error::provider_not_found(format!("no provider found with name: {provider_name}"))
        })?;

        provider.set_sdk_client(client.client());

        client.update_provider_pricing().map_err(|e| {
            Error::with_source(
                ErrorKind::PricingUpdateFailed,
                "failed to update pricing information",
                e,
            )
        })
    }

    /// Refresh pricing on every registered provider
    ///
    /// Continues past individual failures; only the last error is
    /// retained and wrapped. Each failure is logged as it happens.
    pub fn update_all_pricing(&self) -> Result<()> {
        let mut last_err: Option<Error> = None;

        for provider in self.registry.all() {
            if let Err(err) = provider.update_pricing() {
                tracing::warn!(
                    provider = provider.name(),
                    error = %err,
                    "pricing update failed"
                );
                last_err = Some(err);
            }
        }

        match last_err {
            Some(err) => Err(Error::with_source(
                ErrorKind::PricingUpdateFailed,
                "failed to update pricing for one or more providers",
                err,
            )),
            None => Ok(()),
        }
    }

    /// Extract token usage from a response via a named provider
    pub fn track_token_usage(
        &self,
        provider_name: &str,
        response: &VendorResponse,
    ) -> Result<TokenCount> {
        let provider = self.registry.get(provider_name).ok_or_else(|| {
            Error::provider_not_found(format!("no provider found with name: {provider_name}"))
        })?;

        provider.extract_token_usage(response)
    }
}

impl std::fmt::Debug for TokenTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenTracker")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
