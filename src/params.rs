//! Request parameter types for token counting and call tracking

use crate::message::Message;
use crate::tools::{ToolChoice, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parameters for a token-counting request
///
/// A valid request supplies `model` plus either `text` or at least one
/// message. When both are present, `text` wins and messages are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCountParams {
    /// Model the request targets (required, non-empty)
    pub model: String,
    /// Raw text to count, if counting a single string
    pub text: Option<String>,
    /// Chat messages to count, if counting a conversation
    pub messages: Vec<Message>,
    /// Tool definitions included in the request
    pub tools: Vec<ToolDefinition>,
    /// Tool choice specification, if any
    pub tool_choice: Option<ToolChoice>,
    /// Also produce an estimated response-token count (a forward guess)
    pub count_response_tokens: bool,
}

impl TokenCountParams {
    /// Parameters for counting a single text string
    #[must_use]
    pub fn for_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: Some(text.into()),
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: None,
            count_response_tokens: false,
        }
    }

    /// Parameters for counting a conversation
    #[must_use]
    pub fn for_messages(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            text: None,
            messages,
            tools: Vec::new(),
            tool_choice: None,
            count_response_tokens: false,
        }
    }

    /// Fold tool definitions into the count
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Fold a tool choice into the count
    #[must_use]
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    /// Request an estimated response-token count as well
    #[must_use]
    pub fn with_response_estimate(mut self) -> Self {
        self.count_response_tokens = true;
        self
    }
}

/// Parameters for a tracked LLM call
#[derive(Debug, Clone)]
pub struct CallParams {
    /// Model the call was made against
    pub model: String,
    /// Token-counting parameters for the call's input
    pub params: TokenCountParams,
    /// When the call started (used to compute duration)
    pub start_time: Instant,
}

impl CallParams {
    /// Create call parameters, starting the clock now
    #[must_use]
    pub fn new(params: TokenCountParams) -> Self {
        Self {
            model: params.model.clone(),
            params,
            start_time: Instant::now(),
        }
    }

    /// Create call parameters with an explicit start instant
    #[must_use]
    pub fn started_at(params: TokenCountParams, start_time: Instant) -> Self {
        Self {
            model: params.model.clone(),
            params,
            start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolDefinition;

    #[test]
    fn test_text_params() {
        let params = TokenCountParams::for_text("gpt-4", "hello");
        assert_eq!(params.model, "gpt-4");
        assert_eq!(params.text.as_deref(), Some("hello"));
        assert!(params.messages.is_empty());
        assert!(!params.count_response_tokens);
    }

    #[test]
    fn test_message_params_builders() {
        let params = TokenCountParams::for_messages("gpt-4", vec![Message::user("hi")])
            .with_tools(vec![ToolDefinition::new(
                "t",
                "a tool",
                serde_json::json!({}),
            )])
            .with_tool_choice(ToolChoice::Auto)
            .with_response_estimate();

        assert!(params.text.is_none());
        assert_eq!(params.messages.len(), 1);
        assert_eq!(params.tools.len(), 1);
        assert!(params.tool_choice.is_some());
        assert!(params.count_response_tokens);
    }

    #[test]
    fn test_call_params_model_mirrors_params() {
        let call = CallParams::new(TokenCountParams::for_text("gemini-pro", "hi"));
        assert_eq!(call.model, "gemini-pro");
        assert!(call.start_time.elapsed().as_secs() < 1);
    }
}
