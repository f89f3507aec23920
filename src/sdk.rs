//! SDK client boundary
//!
//! The core never talks to vendor SDKs directly. An adapter wrapping an
//! official SDK client implements [`SdkClientWrapper`]; the tracker
//! consumes it to hand the raw client to a provider and to drive pricing
//! refreshes from a live source. This crate ships no implementations.

use crate::config::ModelPricing;
use crate::error::Result;
use crate::provider::VendorResponse;
use crate::types::{TokenUsage, UsageMetrics};
use std::any::Any;
use std::collections::HashMap;

/// Adapter contract for an official vendor SDK client
#[cfg_attr(test, mockall::automock)]
pub trait SdkClientWrapper: Send + Sync {
    /// Name of the provider this client belongs to (e.g. "openai")
    fn provider_name(&self) -> String;

    /// The underlying SDK client instance, as an opaque handle
    fn client(&self) -> Box<dyn Any + Send + Sync>;

    /// Model identifiers supported by this provider
    fn supported_models(&self) -> Result<Vec<String>>;

    /// Extract token usage from an API response
    fn extract_token_usage(&self, response: &VendorResponse) -> Result<TokenUsage>;

    /// Fetch current pricing for all supported models
    fn fetch_current_pricing(&self) -> Result<HashMap<String, ModelPricing>>;

    /// Push fresh pricing into the provider, all-or-nothing
    fn update_provider_pricing(&self) -> Result<()>;

    /// Track an API call and return assembled usage metrics
    fn track_api_call(&self, model: &str, response: &VendorResponse) -> Result<UsageMetrics>;
}
