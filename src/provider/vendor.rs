//! Generic vendor provider
//!
//! [`VendorProvider`] is the single concrete [`Provider`] implementation;
//! a [`VendorProfile`] supplies everything vendor-specific. The provider
//! owns its pricing table, an optional opaque SDK client handle, and an
//! optional injected token cache.

use super::profile::{TokenEstimator, VendorProfile};
use super::{Provider, VendorResponse};
use crate::cache::TokenCache;
use crate::config::{Config, ModelPricing};
use crate::error::{Error, Result};
use crate::params::TokenCountParams;
use crate::types::{ModelInfo, Price, TokenCount};
use crate::util::extract_text_from_messages;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Global tokenizer instance (initialized once, thread-safe)
static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    cl100k_base().expect("cl100k_base tokenizer is a compile-time constant and should never fail")
});

/// Provider for one LLM vendor, driven by a [`VendorProfile`]
pub struct VendorProvider {
    profile: VendorProfile,
    pricing: RwLock<HashMap<String, ModelPricing>>,
    sdk_client: RwLock<Option<Box<dyn Any + Send + Sync>>>,
    cache: Option<Arc<TokenCache>>,
}

impl std::fmt::Debug for VendorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorProvider")
            .field("profile", &self.profile)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl VendorProvider {
    /// Create a provider seeded with the profile's default pricing
    #[must_use]
    pub fn new(profile: VendorProfile) -> Self {
        let pricing = profile.pricing.clone();
        Self {
            profile,
            pricing: RwLock::new(pricing),
            sdk_client: RwLock::new(None),
            cache: None,
        }
    }

    /// Create a provider seeded from a pricing configuration
    ///
    /// Entries in `config` for this provider override the profile's
    /// defaults; models absent from the config keep the defaults.
    #[must_use]
    pub fn from_config(profile: VendorProfile, config: &Config) -> Self {
        let mut pricing = profile.pricing.clone();
        if let Some(configured) = config.provider_pricing(profile.name) {
            pricing.extend(configured);
        }
        Self {
            profile,
            pricing: RwLock::new(pricing),
            sdk_client: RwLock::new(None),
            cache: None,
        }
    }

    /// Attach a shared token-count cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Count tokens in raw text according to the profile's estimator
    fn count_text(&self, model: &str, text: &str) -> Result<u32> {
        if let Some(cache) = &self.cache {
            if let Some(count) = cache.get(self.profile.name, model, text) {
                return Ok(count);
            }
        }

        let count = match self.profile.estimator {
            TokenEstimator::Cl100k => {
                u32::try_from(TOKENIZER.encode_with_special_tokens(text).len()).map_err(|e| {
                    Error::with_source(
                        crate::error::ErrorKind::TokenizationFailed,
                        "token count exceeds u32 range",
                        e,
                    )
                })?
            }
            TokenEstimator::CharsPerToken {
                numer,
                denom,
                overhead,
            } => {
                let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                chars / denom * numer + (chars % denom) * numer / denom + overhead
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(self.profile.name, model, text, count);
        }
        Ok(count)
    }

    /// Count tokens for a conversation, folding in tools and tool choice
    fn count_messages(&self, params: &TokenCountParams) -> Result<u32> {
        match self.profile.estimator {
            TokenEstimator::Cl100k => {
                // The conversation is counted in its serialized form, the
                // closest cheap stand-in for the wire representation.
                let messages_json = serde_json::to_string(&params.messages)
                    .map_err(|e| Error::with_source(
                        crate::error::ErrorKind::TokenizationFailed,
                        "failed to serialize messages",
                        e,
                    ))?;
                let mut tokens = self.count_text(&params.model, &messages_json)?;

                if !params.tools.is_empty() {
                    let tools_json = serde_json::to_string(&params.tools).map_err(|e| {
                        Error::with_source(
                            crate::error::ErrorKind::TokenizationFailed,
                            "failed to serialize tools",
                            e,
                        )
                    })?;
                    tokens += self.count_text(&params.model, &tools_json)?;
                }
                if let Some(tool_choice) = &params.tool_choice {
                    let choice_json = serde_json::to_string(tool_choice).map_err(|e| {
                        Error::with_source(
                            crate::error::ErrorKind::TokenizationFailed,
                            "failed to serialize tool choice",
                            e,
                        )
                    })?;
                    tokens += self.count_text(&params.model, &choice_json)?;
                }

                Ok(tokens + self.profile.format_overhead)
            }
            TokenEstimator::CharsPerToken { .. } => {
                let text = extract_text_from_messages(&params.messages);
                let mut tokens = self.count_text(&params.model, &text)?;

                // Structural overhead for roles and separators
                tokens += self.profile.per_message_overhead
                    * u32::try_from(params.messages.len()).unwrap_or(u32::MAX);

                if !params.tools.is_empty() {
                    if let Ok(tools_json) = serde_json::to_string(&params.tools) {
                        tokens += self.count_text(&params.model, &tools_json)?;
                    }
                }
                if let Some(tool_choice) = &params.tool_choice {
                    if let Ok(choice_json) = serde_json::to_string(tool_choice) {
                        tokens += self.count_text(&params.model, &choice_json)?;
                    }
                }

                Ok(tokens)
            }
        }
    }

    /// Read a numeric usage field out of a JSON usage object
    fn usage_number(usage: &serde_json::Value, field: &str) -> Result<u32> {
        let value = usage.get(field).ok_or_else(|| {
            Error::invalid_params(format!("token counts not found in response: {field}"))
        })?;
        let number = value.as_f64().ok_or_else(|| {
            Error::invalid_params(format!("usage field is not numeric: {field}"))
        })?;
        if number < 0.0 {
            return Err(Error::invalid_params(format!(
                "usage field is negative: {field}"
            )));
        }
        Ok(number as u32)
    }
}

impl Provider for VendorProvider {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn supports_model(&self, model: &str) -> bool {
        !model.is_empty() && self.profile.models.iter().any(|m| m == model)
    }

    fn count_tokens(&self, params: &TokenCountParams) -> Result<TokenCount> {
        if params.model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }

        let input_tokens = if let Some(text) = &params.text {
            self.count_text(&params.model, text)?
        } else if !params.messages.is_empty() {
            self.count_messages(params)?
        } else {
            return Err(Error::invalid_params(
                "either text or messages must be provided",
            ));
        };

        let response_tokens = if params.count_response_tokens {
            (self.profile.response_ratio)(&params.model, input_tokens)
        } else {
            0
        };

        Ok(TokenCount::new(input_tokens, response_tokens))
    }

    fn calculate_price(
        &self,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<Price> {
        if model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }

        let pricing = {
            let table = self.pricing.read().unwrap_or_else(|e| e.into_inner());
            table.get(model).cloned()
        }
        .ok_or_else(|| {
            Error::pricing_not_found(format!("pricing not found for model: {model}"))
        })?;

        let input_cost = f64::from(input_tokens) * pricing.input_price_per_token;
        let output_cost = f64::from(output_tokens) * pricing.output_price_per_token;
        Ok(Price::new(input_cost, output_cost, pricing.currency))
    }

    fn set_sdk_client(&self, client: Box<dyn Any + Send + Sync>) {
        let mut slot = self.sdk_client.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(client);
    }

    fn model_info(&self, model: &str) -> Result<ModelInfo> {
        self.profile.model_info.get(model).cloned().ok_or_else(|| {
            Error::invalid_model(format!("model info not found for: {model}"))
        })
    }

    fn extract_token_usage(&self, response: &VendorResponse) -> Result<TokenCount> {
        match response {
            VendorResponse::Usage(usage) => {
                Ok(TokenCount::new(usage.input_tokens, usage.output_tokens))
            }
            VendorResponse::Json(value) => {
                if value.is_null() {
                    return Err(Error::invalid_params("response is nil"));
                }
                let object = value
                    .as_object()
                    .ok_or_else(|| Error::invalid_params("response is not an object"))?;

                let fields = &self.profile.usage_fields;
                let usage = object.get(fields.container).ok_or_else(|| {
                    Error::invalid_params(format!(
                        "usage information not found in response: {}",
                        fields.container
                    ))
                })?;

                let input = Self::usage_number(usage, fields.input)?;
                let output = Self::usage_number(usage, fields.output)?;
                Ok(TokenCount::new(input, output))
            }
        }
    }

    fn update_pricing(&self) -> Result<()> {
        // Wholesale replacement with the profile's defaults. A live
        // source would go through the SDK wrapper, not through here.
        let fresh = self.profile.pricing.clone();
        let mut table = self.pricing.write().unwrap_or_else(|e| e.into_inner());
        *table = fresh;
        tracing::debug!(provider = self.profile.name, "pricing table refreshed");
        Ok(())
    }

    fn set_model_pricing(&self, model: &str, pricing: ModelPricing) {
        let mut table = self.pricing.write().unwrap_or_else(|e| e.into_inner());
        table.insert(model.to_string(), pricing);
    }
}
