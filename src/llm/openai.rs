//! OpenAI-compatible chat-completion client

use super::{ChatRequest, CompletionClient};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl OpenAiClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join("chat/completions")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::HttpRequest)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Take the first completion's text out of a raw response body
fn parse_completion(body: &str) -> Result<String> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| Error::UpstreamMalformed {
            reason: format!("failed to parse response: {}", e),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::UpstreamMalformed {
            reason: "response contained no completion text".to_string(),
        })
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            model = %request.model,
            bytes = body.len(),
            "chat completion received"
        );

        parse_completion(&body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
