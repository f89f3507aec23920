//! Provider contract and vendor response handling
//!
//! This module defines the capability contract every vendor strategy
//! must implement, the closed union of response representations the
//! boundary accepts, and the optional capability for responses that
//! already know their completion token count.
//!
//! # Module Structure
//!
//! - `profile`: per-vendor configuration records (allow-list, estimator,
//!   usage field mapping, pricing defaults)
//! - `vendor`: the single generic [`VendorProvider`] driven by a profile
//! - `mock`: configurable mock provider for tests

mod profile;
mod vendor;

pub mod mock;

#[cfg(test)]
mod tests;

pub use profile::{TokenEstimator, UsageFieldMap, VendorProfile};
pub use vendor::VendorProvider;

use crate::config::ModelPricing;
use crate::error::Result;
use crate::params::TokenCountParams;
use crate::types::{ModelInfo, Price, TokenCount, TokenUsage};
use std::any::Any;

/// A vendor response, as accepted by usage extraction
///
/// The boundary accepts exactly two representations: a typed usage
/// payload already produced by an SDK adapter, or a raw JSON body (the
/// shape vendors return over HTTP, also used by tests and mocks).
/// Anything else is rejected at compile time by this closed union.
#[derive(Debug, Clone)]
pub enum VendorResponse {
    /// Usage already extracted by an SDK adapter
    Usage(TokenUsage),
    /// Raw JSON response body
    Json(serde_json::Value),
}

impl From<TokenUsage> for VendorResponse {
    fn from(usage: TokenUsage) -> Self {
        Self::Usage(usage)
    }
}

impl From<serde_json::Value> for VendorResponse {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Capability for response values that carry a completion token count
///
/// Callers tracking a real response implement (or wrap their response
/// in a type implementing) this trait; the tracker queries it before
/// falling back to estimation.
pub trait CompletionTokens {
    /// Number of tokens generated by the model, if known
    fn completion_tokens(&self) -> Option<u32>;
}

impl CompletionTokens for TokenUsage {
    fn completion_tokens(&self) -> Option<u32> {
        Some(self.output_tokens)
    }
}

impl CompletionTokens for VendorResponse {
    fn completion_tokens(&self) -> Option<u32> {
        match self {
            Self::Usage(usage) => Some(usage.output_tokens),
            Self::Json(_) => None,
        }
    }
}

/// Capability contract for one LLM vendor
///
/// One implementation per vendor, selected at runtime through the
/// registry. Implementations are stateless per call apart from their
/// pricing table and an optional SDK client handle.
pub trait Provider: Send + Sync {
    /// Stable, non-empty provider identifier (the registry key)
    fn name(&self) -> &str;

    /// Whether this provider supports the given model
    fn supports_model(&self, model: &str) -> bool;

    /// Count tokens for the given parameters
    fn count_tokens(&self, params: &TokenCountParams) -> Result<TokenCount>;

    /// Calculate price based on token usage
    fn calculate_price(&self, model: &str, input_tokens: u32, output_tokens: u32)
        -> Result<Price>;

    /// Store an opaque vendor SDK client handle for later use
    fn set_sdk_client(&self, client: Box<dyn Any + Send + Sync>);

    /// Descriptive metadata for a model
    fn model_info(&self, model: &str) -> Result<ModelInfo>;

    /// Extract token usage from a vendor response
    fn extract_token_usage(&self, response: &VendorResponse) -> Result<TokenCount>;

    /// Refresh this provider's pricing entries, all-or-nothing
    fn update_pricing(&self) -> Result<()>;

    /// Set pricing for a single model
    fn set_model_pricing(&self, model: &str, pricing: ModelPricing);
}
