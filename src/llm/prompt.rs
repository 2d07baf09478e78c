//! Fixed prompt template for explanations

use serde::Serialize;

/// System instruction sent with every explanation request
pub const SYSTEM_PROMPT: &str = "You are an assistant that explains text for an academic setting and aims to provide thorough explanations.";

const USER_PROMPT_PREFIX: &str = "Please explain the following text in simple and digestible terms, using analogies and examples to help the user understand:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of a chat-completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Build the explanation request for `text`.
///
/// The text is embedded verbatim; JSON encoding of the body is the only escaping applied.
pub fn build_request(model: &str, text: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: format!("{}\n\n\"{}\"", USER_PROMPT_PREFIX, text),
            },
        ],
    }
}
