//! HTTP client for the explanation endpoint

use super::ControllerConfig;
use crate::error::{Error, Result};
use crate::explain::{ExplainRequest, ExplainResponse};
use async_trait::async_trait;
use url::Url;

/// Backend the controller submits selections to
#[async_trait]
pub trait ExplainApi: Send + Sync {
    /// Request an explanation for `text`. Exactly one HTTP call per invocation.
    async fn explain(&self, text: &str) -> Result<String>;

    /// Confirm the document the viewer will load is reachable
    async fn check_document(&self) -> Result<()> {
        Ok(())
    }
}

/// `ExplainApi` over HTTP
#[derive(Clone)]
pub struct HttpExplainClient {
    client: reqwest::Client,
    endpoint: Url,
    document_url: Url,
}

impl HttpExplainClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str, config: &ControllerConfig) -> Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: base.join(&config.endpoint)?,
            document_url: base.join(&config.document_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn document_url(&self) -> &Url {
        &self.document_url
    }
}

#[async_trait]
impl ExplainApi for HttpExplainClient {
    async fn explain(&self, text: &str) -> Result<String> {
        let request = ExplainRequest {
            text: Some(text.to_string()),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ExplainResponse>(&body)
                .ok()
                .and_then(|r| match r {
                    ExplainResponse::Error { error } => Some(error),
                    ExplainResponse::Explanation { .. } => None,
                });
            return Err(Error::EndpointStatus {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_slice::<ExplainResponse>(&body)? {
            ExplainResponse::Explanation { explanation } if !explanation.is_empty() => {
                Ok(explanation)
            }
            _ => Err(Error::EmptyExplanation),
        }
    }

    async fn check_document(&self) -> Result<()> {
        let response = self.client.get(self.document_url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::DocumentUnavailable {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_base() {
        let client =
            HttpExplainClient::new("http://localhost:3000", &ControllerConfig::default()).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:3000/api/explain"
        );
        assert_eq!(
            client.document_url().as_str(),
            "http://localhost:3000/sample.pdf"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpExplainClient::new("localhost", &ControllerConfig::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
