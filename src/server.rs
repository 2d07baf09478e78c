//! HTTP server implementation using axum

use crate::error::Error;
use crate::explain::{ExplainResponse, ExplanationService};
use crate::llm::{CompletionClient, OpenAiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeFile, trace::TraceLayer};

/// Path of the explanation endpoint
pub const EXPLAIN_PATH: &str = "/api/explain";

/// Path the configured PDF is served under
pub const DOCUMENT_PATH: &str = "/sample.pdf";

/// Runtime configuration for the explanation server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:3000)
    pub bind_addr: String,
    /// Credential for the text-generation API; requests fail with 500 while unset
    pub api_key: Option<String>,
    /// Model identifier (default: gpt-4o-mini)
    pub model: String,
    /// API root of the chat-completion service
    pub base_url: String,
    /// Local PDF served at `/sample.pdf`
    pub document_path: PathBuf,
    /// Timeout for the upstream call (default: 60s)
    pub upstream_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            document_path: PathBuf::from("public/sample.pdf"),
            upstream_timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let upstream_timeout = match lookup("PDF_EXPLAINER_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring invalid upstream timeout");
                    defaults.upstream_timeout
                }
            },
            None => defaults.upstream_timeout,
        };

        Self {
            bind_addr: lookup("PDF_EXPLAINER_BIND").unwrap_or(defaults.bind_addr),
            api_key: lookup("OPENAI_API_KEY"),
            model: lookup("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            document_path: lookup("PDF_EXPLAINER_DOCUMENT")
                .map(PathBuf::from)
                .unwrap_or(defaults.document_path),
            upstream_timeout,
        }
    }

    /// Build the explanation service backed by the OpenAI-compatible client
    pub fn explanation_service(&self) -> crate::error::Result<ExplanationService> {
        let client: Arc<dyn CompletionClient> =
            Arc::new(OpenAiClient::new(&self.base_url, self.upstream_timeout)?);
        Ok(ExplanationService::new(
            client,
            self.api_key.clone(),
            &self.model,
        ))
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<ExplanationService>,
}

/// Build the router: explain endpoint, health check and the static PDF.
pub fn build_router(service: ExplanationService, document_path: PathBuf) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route(EXPLAIN_PATH, post(explain).fallback(method_not_allowed))
        .route("/health", get(health))
        .route_service(DOCUMENT_PATH, ServeFile::new(document_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn explain(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ExplainResponse>) {
    let (status, response) = state.service.handle(&body).await;
    (status, Json(response))
}

async fn method_not_allowed(method: Method) -> (StatusCode, Json<ExplainResponse>) {
    let err = Error::MethodNotAllowed {
        method: method.to_string(),
    };
    tracing::warn!(error = %err, "explain request rejected");
    (
        err.status_code(),
        Json(ExplainResponse::Error {
            error: err.client_message(),
        }),
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run the server with configuration from the environment
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::from_env()).await
}

/// Run the server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let service = config.explanation_service()?;
    if !service.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; explain requests will fail with 500");
    }
    if !config.document_path.exists() {
        tracing::warn!(
            path = %config.document_path.display(),
            "document not found; {} will answer 404",
            DOCUMENT_PATH
        );
    }

    let app = build_router(service, config.document_path.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, model = %config.model, "PDF explainer listening");

    axum::serve(listener, app).await?;

    Ok(())
}
