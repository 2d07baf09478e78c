//! Text-generation layer
//!
//! This module is the only place that talks to the hosted chat-completion API.

mod openai;
mod prompt;

pub use openai::{OpenAiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::{build_request, ChatMessage, ChatRequest, Role, SYSTEM_PROMPT};

use crate::error::Result;
use async_trait::async_trait;

/// Chat-completion backend
///
/// Implementations return the text of the first completion, unmodified.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
