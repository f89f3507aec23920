//! Per-vendor configuration records
//!
//! Concrete providers share the same scaffolding; everything that
//! actually differs between vendors lives in a [`VendorProfile`]: the
//! model allow-list, the token estimator, message overheads, the usage
//! field mapping, the response-ratio heuristic, and the default pricing
//! and model-info tables. One [`super::VendorProvider`] instance per
//! profile replaces a family of near-identical provider types.

use crate::config::ModelPricing;
use crate::types::ModelInfo;
use crate::util::estimate_response_tokens;
use std::collections::HashMap;

/// How a profile turns text into a token count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEstimator {
    /// cl100k_base BPE via tiktoken
    Cl100k,
    /// Character-division heuristic: `chars * numer / denom + overhead`
    CharsPerToken {
        /// Numerator of the chars-to-tokens ratio
        numer: u32,
        /// Denominator of the chars-to-tokens ratio
        denom: u32,
        /// Flat overhead added for special tokens
        overhead: u32,
    },
}

/// Where usage numbers live in a vendor's JSON response
#[derive(Debug, Clone)]
pub struct UsageFieldMap {
    /// Top-level object holding the counts (e.g. "usage", "usageMetadata")
    pub container: &'static str,
    /// Field holding the input/prompt token count
    pub input: &'static str,
    /// Field holding the output/completion token count
    pub output: &'static str,
}

/// Everything that distinguishes one vendor from another
pub struct VendorProfile {
    /// Provider name (registry key)
    pub name: &'static str,
    /// Models this vendor claims
    pub models: Vec<String>,
    /// Token estimator for raw text
    pub estimator: TokenEstimator,
    /// Structural overhead added per message when counting conversations
    pub per_message_overhead: u32,
    /// Flat overhead added for message formatting (JSON-counting path)
    pub format_overhead: u32,
    /// Usage field mapping for response extraction
    pub usage_fields: UsageFieldMap,
    /// Response-token estimation policy
    pub response_ratio: fn(model: &str, input_tokens: u32) -> u32,
    /// Default pricing table
    pub pricing: HashMap<String, ModelPricing>,
    /// Model metadata table
    pub model_info: HashMap<String, ModelInfo>,
}

impl std::fmt::Debug for VendorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorProfile")
            .field("name", &self.name)
            .field("models", &self.models)
            .field("estimator", &self.estimator)
            .finish_non_exhaustive()
    }
}

impl VendorProfile {
    /// Profile for OpenAI GPT models
    ///
    /// Uses the real cl100k_base tokenizer; message counting serializes
    /// the conversation to JSON and encodes that.
    #[must_use]
    pub fn openai() -> Self {
        let models = [
            "gpt-3.5-turbo",
            "gpt-3.5-turbo-16k",
            "gpt-4",
            "gpt-4-turbo",
            "gpt-4-32k",
            "gpt-4o",
        ];

        let mut pricing = HashMap::new();
        pricing.insert(
            "gpt-3.5-turbo".to_string(),
            ModelPricing::new(0.000_001_5, 0.000_002),
        );
        pricing.insert("gpt-4".to_string(), ModelPricing::new(0.000_03, 0.000_06));
        pricing.insert(
            "gpt-4-turbo".to_string(),
            ModelPricing::new(0.000_01, 0.000_03),
        );

        let mut model_info = HashMap::new();
        for (model, window, desc) in [
            ("gpt-3.5-turbo", 16_385, "GPT-3.5 Turbo - fast, low-cost chat model"),
            ("gpt-3.5-turbo-16k", 16_385, "GPT-3.5 Turbo with extended context"),
            ("gpt-4", 8_192, "GPT-4 - flagship reasoning model"),
            ("gpt-4-turbo", 128_000, "GPT-4 Turbo - large context, lower cost"),
            ("gpt-4-32k", 32_768, "GPT-4 with 32k context"),
            ("gpt-4o", 128_000, "GPT-4o - multimodal flagship"),
        ] {
            model_info.insert(model.to_string(), info("openai", model, window, desc));
        }

        Self {
            name: "openai",
            models: models.iter().map(ToString::to_string).collect(),
            estimator: TokenEstimator::Cl100k,
            per_message_overhead: 0,
            format_overhead: 3,
            usage_fields: UsageFieldMap {
                container: "usage",
                input: "prompt_tokens",
                output: "completion_tokens",
            },
            response_ratio: openai_response_ratio,
            pricing,
            model_info,
        }
    }

    /// Profile for Anthropic Claude models
    ///
    /// Approximates with a character heuristic slightly below 4 chars
    /// per token (Claude tokenizes a little denser than GPT).
    #[must_use]
    pub fn anthropic() -> Self {
        let models = ["claude-3-haiku", "claude-3-sonnet", "claude-3-opus"];

        let mut pricing = HashMap::new();
        pricing.insert(
            "claude-3-haiku".to_string(),
            ModelPricing::new(0.000_000_25, 0.000_001_25),
        );
        pricing.insert(
            "claude-3-sonnet".to_string(),
            ModelPricing::new(0.000_003, 0.000_015),
        );
        pricing.insert(
            "claude-3-opus".to_string(),
            ModelPricing::new(0.000_015, 0.000_075),
        );

        let mut model_info = HashMap::new();
        for (model, desc) in [
            ("claude-3-haiku", "Claude 3 Haiku - fastest and most compact model"),
            ("claude-3-sonnet", "Claude 3 Sonnet - balanced performance and intelligence"),
            ("claude-3-opus", "Claude 3 Opus - most powerful model for complex tasks"),
        ] {
            model_info.insert(model.to_string(), info("anthropic", model, 200_000, desc));
        }

        Self {
            name: "anthropic",
            models: models.iter().map(ToString::to_string).collect(),
            estimator: TokenEstimator::CharsPerToken {
                numer: 95,
                denom: 400,
                overhead: 5,
            },
            per_message_overhead: 6,
            format_overhead: 0,
            usage_fields: UsageFieldMap {
                container: "usage",
                input: "input_tokens",
                output: "output_tokens",
            },
            response_ratio: anthropic_response_ratio,
            pricing,
            model_info,
        }
    }

    /// Profile for Google Gemini models
    #[must_use]
    pub fn gemini() -> Self {
        let models = ["gemini-pro", "gemini-ultra"];

        let mut pricing = HashMap::new();
        pricing.insert(
            "gemini-pro".to_string(),
            ModelPricing::new(0.000_000_25, 0.000_000_5),
        );
        pricing.insert(
            "gemini-ultra".to_string(),
            ModelPricing::new(0.000_01, 0.000_03),
        );

        let mut model_info = HashMap::new();
        for (model, window, desc) in [
            ("gemini-pro", 32_768, "Gemini Pro - balanced multimodal model"),
            ("gemini-ultra", 32_768, "Gemini Ultra - highest-capability model"),
        ] {
            model_info.insert(model.to_string(), info("gemini", model, window, desc));
        }

        Self {
            name: "gemini",
            models: models.iter().map(ToString::to_string).collect(),
            estimator: TokenEstimator::CharsPerToken {
                numer: 1,
                denom: 4,
                overhead: 3,
            },
            per_message_overhead: 4,
            format_overhead: 0,
            usage_fields: UsageFieldMap {
                container: "usageMetadata",
                input: "promptTokenCount",
                output: "candidatesTokenCount",
            },
            response_ratio: gemini_response_ratio,
            pricing,
            model_info,
        }
    }
}

fn info(provider: &str, model: &str, context_window: u32, description: &str) -> ModelInfo {
    ModelInfo {
        model: model.to_string(),
        provider: provider.to_string(),
        context_window,
        description: description.to_string(),
    }
}

/// GPT-4 answers at roughly prompt length; GPT-3.5 is terser
fn openai_response_ratio(model: &str, input_tokens: u32) -> u32 {
    if model.contains("gpt-4") {
        input_tokens
    } else if model.contains("gpt-3.5") {
        input_tokens / 2
    } else {
        estimate_response_tokens(model, input_tokens)
    }
}

/// Opus runs verbose, Sonnet moderate, Haiku concise
fn anthropic_response_ratio(model: &str, input_tokens: u32) -> u32 {
    if model.contains("opus") {
        input_tokens * 2
    } else if model.contains("sonnet") {
        input_tokens * 3 / 2
    } else if model.contains("haiku") {
        input_tokens
    } else {
        estimate_response_tokens(model, input_tokens)
    }
}

/// Ultra runs verbose, Pro concise
fn gemini_response_ratio(model: &str, input_tokens: u32) -> u32 {
    if model.contains("ultra") {
        input_tokens * 3 / 2
    } else {
        input_tokens / 2
    }
}
