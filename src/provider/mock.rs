//! Mock provider for testing
//!
//! This module provides a configurable provider that returns fixed
//! token counts and prices, with optional failure injection.

use super::{Provider, VendorResponse};
use crate::config::ModelPricing;
use crate::error::{Error, Result};
use crate::params::TokenCountParams;
use crate::types::{ModelInfo, Price, TokenCount};
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

/// A mock provider returning fixed results
pub struct MockProvider {
    name: String,
    models: Vec<String>,
    token_count: TokenCount,
    price: Price,
    fail_pricing_update: AtomicBool,
    pricing_updates: AtomicUsize,
    pricing_overrides: RwLock<Vec<(String, ModelPricing)>>,
    sdk_client: Mutex<Option<Box<dyn Any + Send + Sync>>>,
}

impl MockProvider {
    /// Create a mock provider claiming the given models
    #[must_use]
    pub fn new(name: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            name: name.into(),
            models,
            token_count: TokenCount::new(10, 0),
            price: Price::new(0.001, 0.002, "USD"),
            fail_pricing_update: AtomicBool::new(false),
            pricing_updates: AtomicUsize::new(0),
            pricing_overrides: RwLock::new(Vec::new()),
            sdk_client: Mutex::new(None),
        }
    }

    /// Fix the token count returned by `count_tokens`
    #[must_use]
    pub fn with_token_count(mut self, token_count: TokenCount) -> Self {
        self.token_count = token_count;
        self
    }

    /// Fix the price returned by `calculate_price`
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }

    /// Make `update_pricing` fail
    #[must_use]
    pub fn failing_pricing_update(self) -> Self {
        self.fail_pricing_update.store(true, Ordering::SeqCst);
        self
    }

    /// Number of `update_pricing` calls observed
    #[must_use]
    pub fn pricing_update_count(&self) -> usize {
        self.pricing_updates.load(Ordering::SeqCst)
    }

    /// Whether an SDK client handle has been stored
    #[must_use]
    pub fn has_sdk_client(&self) -> bool {
        self.sdk_client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Pricing entries set via `set_model_pricing`, in call order
    #[must_use]
    pub fn pricing_overrides(&self) -> Vec<(String, ModelPricing)> {
        self.pricing_overrides
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    fn count_tokens(&self, params: &TokenCountParams) -> Result<TokenCount> {
        if params.model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }
        if params.text.is_none() && params.messages.is_empty() {
            return Err(Error::invalid_params(
                "either text or messages must be provided",
            ));
        }
        Ok(self.token_count)
    }

    fn calculate_price(
        &self,
        model: &str,
        _input_tokens: u32,
        _output_tokens: u32,
    ) -> Result<Price> {
        if model.is_empty() {
            return Err(Error::invalid_params("model is required"));
        }
        Ok(self.price.clone())
    }

    fn set_sdk_client(&self, client: Box<dyn Any + Send + Sync>) {
        let mut slot = self.sdk_client.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(client);
    }

    fn model_info(&self, model: &str) -> Result<ModelInfo> {
        if !self.supports_model(model) {
            return Err(Error::invalid_model(format!(
                "model info not found for: {model}"
            )));
        }
        Ok(ModelInfo {
            model: model.to_string(),
            provider: self.name.clone(),
            context_window: 8_192,
            description: "mock model".to_string(),
        })
    }

    fn extract_token_usage(&self, response: &VendorResponse) -> Result<TokenCount> {
        match response {
            VendorResponse::Usage(usage) => {
                Ok(TokenCount::new(usage.input_tokens, usage.output_tokens))
            }
            VendorResponse::Json(value) if value.is_object() => Ok(self.token_count),
            VendorResponse::Json(value) if value.is_null() => {
                Err(Error::invalid_params("response is nil"))
            }
            VendorResponse::Json(_) => Err(Error::invalid_params("response is not an object")),
        }
    }

    fn update_pricing(&self) -> Result<()> {
        self.pricing_updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_pricing_update.load(Ordering::SeqCst) {
            return Err(Error::pricing_update_failed(format!(
                "simulated pricing failure for {}",
                self.name
            )));
        }
        Ok(())
    }

    fn set_model_pricing(&self, model: &str, pricing: ModelPricing) {
        self.pricing_overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((model.to_string(), pricing));
    }
}
