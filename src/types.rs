//! Core value types: token counts, prices, usage metrics
//!
//! These are per-request value objects. `TokenCount` and `Price` enforce
//! their totals at construction and are never re-derived afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token counting results for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    /// Tokens in the prompt/input
    pub input_tokens: u32,
    /// Tokens in (or estimated for) the response
    pub response_tokens: u32,
    /// Always `input_tokens + response_tokens`
    pub total_tokens: u32,
}

impl TokenCount {
    /// Create a token count; the total is derived here
    #[must_use]
    pub fn new(input_tokens: u32, response_tokens: u32) -> Self {
        Self {
            input_tokens,
            response_tokens,
            total_tokens: input_tokens + response_tokens,
        }
    }
}

/// Pricing result for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Cost attributed to input tokens
    pub input_cost: f64,
    /// Cost attributed to output tokens
    pub output_cost: f64,
    /// Always `input_cost + output_cost`
    pub total_cost: f64,
    /// ISO 4217 currency code (e.g. "USD")
    pub currency: String,
}

impl Price {
    /// Create a price; the total is derived here
    #[must_use]
    pub fn new(input_cost: f64, output_cost: f64, currency: impl Into<String>) -> Self {
        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
            currency: currency.into(),
        }
    }
}

/// Complete usage record for one tracked LLM call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Token tallies
    pub token_count: TokenCount,
    /// Monetary cost
    pub price: Price,
    /// Elapsed time from call start to tracking
    pub duration: Duration,
    /// When the metrics were assembled
    pub timestamp: DateTime<Utc>,
    /// Model the call was made against
    pub model: String,
    /// Provider that served the call
    pub provider: String,
}

/// Token usage extracted from an API response by an SDK adapter
///
/// Richer than [`TokenCount`]: adapters also surface the completion id
/// and model echoed back by the vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub input_tokens: u32,
    /// Tokens generated by the model
    pub output_tokens: u32,
    /// Total tokens billed
    pub total_tokens: u32,
    /// Vendor-assigned completion id, if present
    pub completion_id: Option<String>,
    /// Model name echoed by the vendor, if present
    pub model: Option<String>,
    /// When the usage was extracted
    pub timestamp: DateTime<Utc>,
}

impl TokenUsage {
    /// Create a usage record; the total is derived here
    #[must_use]
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            completion_id: None,
            model: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the vendor completion id
    #[must_use]
    pub fn with_completion_id(mut self, id: impl Into<String>) -> Self {
        self.completion_id = Some(id.into());
        self
    }

    /// Attach the vendor-echoed model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl From<TokenUsage> for TokenCount {
    fn from(usage: TokenUsage) -> Self {
        TokenCount::new(usage.input_tokens, usage.output_tokens)
    }
}

/// Descriptive metadata for a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub model: String,
    /// Provider name
    pub provider: String,
    /// Context window size in tokens
    pub context_window: u32,
    /// Human-readable description
    pub description: String,
}
