//! Shared helpers for token counting
//!
//! Text extraction from message sequences and the cross-vendor
//! response-token estimation table. Per-vendor profiles override the
//! estimation where they have better numbers.

use crate::message::Message;

/// Extract all textual content from messages, one line per fragment
#[must_use]
pub fn extract_text_from_messages(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let text = message.content.text();
        if !text.is_empty() {
            out.push_str(&text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// Estimate response tokens from input tokens for a model
///
/// A forward guess based on how verbose each model family tends to be,
/// not a measurement. Used when a real response token count is
/// unavailable.
#[must_use]
pub fn estimate_response_tokens(model: &str, input_tokens: u32) -> u32 {
    if model.contains("gpt-4") {
        input_tokens
    } else if model.contains("gpt-3.5") {
        input_tokens / 2
    } else if model.contains("claude") {
        if model.contains("opus") {
            input_tokens * 2
        } else if model.contains("sonnet") {
            input_tokens
        } else {
            input_tokens / 2
        }
    } else if model.contains("gemini") {
        if model.contains("ultra") {
            input_tokens * 3 / 2
        } else {
            input_tokens / 2
        }
    } else {
        input_tokens / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ContentPart, Message, MessageRole};

    #[test]
    fn test_extract_text_plain_messages() {
        let messages = vec![Message::system("Be brief."), Message::user("Hello")];
        let text = extract_text_from_messages(&messages);
        assert_eq!(text, "Be brief.\nHello\n");
    }

    #[test]
    fn test_extract_text_skips_images() {
        let messages = vec![Message::with_parts(
            MessageRole::User,
            vec![
                ContentPart::Text {
                    text: "look at this".to_string(),
                },
                ContentPart::Image {
                    image: serde_json::json!({"url": "x"}),
                },
            ],
        )];
        let text = extract_text_from_messages(&messages);
        assert_eq!(text, "look at this\n");
    }

    #[test]
    fn test_estimate_response_tokens_families() {
        assert_eq!(estimate_response_tokens("gpt-4", 100), 100);
        assert_eq!(estimate_response_tokens("gpt-3.5-turbo", 100), 50);
        assert_eq!(estimate_response_tokens("claude-3-opus", 100), 200);
        assert_eq!(estimate_response_tokens("claude-3-sonnet", 100), 100);
        assert_eq!(estimate_response_tokens("claude-3-haiku", 100), 50);
        assert_eq!(estimate_response_tokens("gemini-ultra", 100), 150);
        assert_eq!(estimate_response_tokens("gemini-pro", 100), 50);
        assert_eq!(estimate_response_tokens("mystery-model", 100), 50);
    }
}
