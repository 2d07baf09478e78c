//! Explanation service: validate, call the text-generation API, answer

use crate::error::{Error, Result};
use crate::llm::{build_request, CompletionClient};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Wire body of `POST /api/explain`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Wire body of every `/api/explain` answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExplainResponse {
    Explanation { explanation: String },
    Error { error: String },
}

impl ExplainResponse {
    pub fn explanation(&self) -> Option<&str> {
        match self {
            ExplainResponse::Explanation { explanation } => Some(explanation),
            ExplainResponse::Error { .. } => None,
        }
    }
}

/// Parse a raw request body and return the text to explain.
///
/// The body must be a JSON object. Blank, null or absent `text` is
/// `MissingText`; a non-string `text` is `InvalidBody`. The returned text is
/// untrimmed.
pub fn parse_request(body: &[u8]) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| Error::InvalidBody {
            reason: e.to_string(),
        })?;

    let object = value.as_object().ok_or_else(|| Error::InvalidBody {
        reason: "expected a JSON object".to_string(),
    })?;

    match object.get("text") {
        None | Some(serde_json::Value::Null) => Err(Error::MissingText),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => {
            Err(Error::MissingText)
        }
        Some(serde_json::Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(Error::InvalidBody {
            reason: "`text` must be a string".to_string(),
        }),
    }
}

/// Stateless explanation handler
#[derive(Clone)]
pub struct ExplanationService {
    client: Arc<dyn CompletionClient>,
    api_key: Option<String>,
    model: String,
}

impl ExplanationService {
    pub fn new(client: Arc<dyn CompletionClient>, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            // An empty credential is as good as none
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Explain `text` with a single best-effort upstream call.
    pub async fn explain(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::MissingText);
        }
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;

        let request = build_request(&self.model, text);
        let started = Instant::now();
        let explanation = self.client.complete(api_key, &request).await?;

        tracing::info!(
            provider = self.client.provider_name(),
            model = %self.model,
            chars = text.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "explanation generated"
        );

        Ok(explanation)
    }

    /// Handle a raw request body, producing the status and JSON answer.
    pub async fn handle(&self, body: &[u8]) -> (StatusCode, ExplainResponse) {
        let outcome = match parse_request(body) {
            Ok(text) => self.explain(&text).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(explanation) => (StatusCode::OK, ExplainResponse::Explanation { explanation }),
            Err(e) => {
                if e.status_code().is_server_error() {
                    tracing::error!(error = %e, "explain request failed");
                } else {
                    tracing::warn!(error = %e, "explain request rejected");
                }
                (
                    e.status_code(),
                    ExplainResponse::Error {
                        error: e.client_message(),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MISSING_TEXT_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
    use crate::llm::{ChatRequest, Role};
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockClient {
        calls: AtomicUsize,
        reply: std::result::Result<String, u16>,
        last_prompt: Mutex<Option<ChatRequest>>,
    }

    impl MockClient {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Ok(text.to_string()),
                last_prompt: Mutex::new(None),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Err(status),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(&self, _api_key: &str, request: &ChatRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(Error::UpstreamStatus {
                    status: *status,
                    body: "rate limited".to_string(),
                }),
            }
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    fn service(client: Arc<MockClient>, key: Option<&str>) -> ExplanationService {
        ExplanationService::new(client, key.map(str::to_string), "test-model")
    }

    #[rstest]
    #[case(r#"{"text": "photosynthesis"}"#, "photosynthesis")]
    #[case(r#"{"text": "  padded  "}"#, "  padded  ")]
    #[case(r#"{"text": "x", "extra": 1}"#, "x")]
    fn test_parse_request_accepts(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(parse_request(body.as_bytes()).unwrap(), expected);
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"text": ""}"#)]
    #[case(r#"{"text": "   \n\t"}"#)]
    #[case(r#"{"text": null}"#)]
    fn test_parse_request_missing_text(#[case] body: &str) {
        assert!(matches!(
            parse_request(body.as_bytes()),
            Err(Error::MissingText)
        ));
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case(r#"{"text": 42}"#)]
    #[case(r#"["text"]"#)]
    #[case(r#""photosynthesis""#)]
    #[case("null")]
    #[case(r#"{"text": ["a"]}"#)]
    fn test_parse_request_invalid_body(#[case] body: &str) {
        assert!(matches!(
            parse_request(body.as_bytes()),
            Err(Error::InvalidBody { .. })
        ));
    }

    #[tokio::test]
    async fn test_success_returns_upstream_text_unmodified() {
        let client = MockClient::answering("  Plants turn light into food.\n");
        let service = service(client.clone(), Some("sk-test"));

        let (status, response) = service.handle(br#"{"text": "photosynthesis"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.explanation(),
            Some("  Plants turn light into food.\n")
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let prompt = client.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt.model, "test-model");
        assert_eq!(prompt.messages[1].role, Role::User);
        assert!(prompt.messages[1].content.contains("\"photosynthesis\""));
    }

    #[tokio::test]
    async fn test_missing_text_never_calls_upstream() {
        let client = MockClient::answering("unused");
        let service = service(client.clone(), Some("sk-test"));

        let (status, response) = service.handle(br#"{"text": "  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            ExplainResponse::Error {
                error: MISSING_TEXT_MESSAGE.to_string()
            }
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_upstream() {
        let client = MockClient::answering("unused");
        for key in [None, Some(""), Some("   ")] {
            let service = service(client.clone(), key);
            assert!(!service.is_configured());

            let (status, response) = service.handle(br#"{"text": "photosynthesis"}"#).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(response.explanation().is_none());
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let client = MockClient::failing(429);
        let service = service(client.clone(), Some("sk-test"));

        let (status, response) = service.handle(br#"{"text": "photosynthesis"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response,
            ExplainResponse::Error {
                error: UPSTREAM_FAILURE_MESSAGE.to_string()
            }
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_response_wire_shapes() {
        let ok: ExplainResponse = serde_json::from_str(r#"{"explanation": "e"}"#).unwrap();
        assert_eq!(ok.explanation(), Some("e"));

        let err: ExplainResponse = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert!(matches!(err, ExplainResponse::Error { .. }));

        let json = serde_json::to_value(ExplainResponse::Explanation {
            explanation: "e".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "explanation": "e" }));
    }
}
