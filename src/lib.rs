//! Token Ledger - LLM Token Counting and Cost Tracking
//!
//! This crate tracks token consumption and spend across LLM providers:
//! - Tracker: orchestrates counting, pricing and usage metrics
//! - Registry: thread-safe provider lookup by name or by model
//! - Providers: OpenAI (tiktoken), Anthropic and Gemini (heuristics)
//! - Config: per-provider pricing tables with JSON persistence
//! - Cache: bounded text-to-token-count cache shared across providers
//! - SDK boundary: adapter trait for wiring official vendor clients
//!
//! Counts for non-OpenAI vendors are character-based estimates, not
//! exact tokenizer output. Prices are computed from per-token rates.
//!
//! # Example
//!
//! ```
//! use tokenledger::{TokenCountParams, TokenTracker};
//!
//! let tracker = TokenTracker::default();
//! tracker.register_defaults();
//!
//! let params = TokenCountParams::for_text("gpt-4", "Hello, world!");
//! let count = tracker.count_tokens(&params)?;
//! let price = tracker.calculate_price("gpt-4", count.input_tokens, 0)?;
//! assert_eq!(price.currency, "USD");
//! # Ok::<(), tokenledger::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod message;
pub mod params;
pub mod provider;
pub mod registry;
pub mod sdk;
pub mod tools;
pub mod tracker;
pub mod types;
pub mod util;

pub use cache::TokenCache;
pub use config::{Config, ModelPricing, ProviderConfig};
pub use error::{Error, ErrorKind, Result};
pub use message::{ContentPart, Message, MessageContent, MessageRole};
pub use params::{CallParams, TokenCountParams};
pub use provider::{
    CompletionTokens, Provider, TokenEstimator, UsageFieldMap, VendorProfile, VendorProvider,
    VendorResponse,
};
pub use registry::ProviderRegistry;
pub use sdk::SdkClientWrapper;
pub use tools::{ToolChoice, ToolDefinition};
pub use tracker::TokenTracker;
pub use types::{ModelInfo, Price, TokenCount, TokenUsage, UsageMetrics};
