//! Error types for the PDF explainer

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for the PDF explainer
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when `text` is absent or blank
pub const MISSING_TEXT_MESSAGE: &str = "Missing \"text\" in request body.";

/// Message shown for any upstream failure
pub const UPSTREAM_FAILURE_MESSAGE: &str = "An error occurred while fetching the explanation.";

/// Broad failure category, used to decide status codes and retry behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input; not retryable as-is
    Validation,
    /// Missing credential; operator-fixable
    Configuration,
    /// The text-generation API failed or answered with an unexpected shape
    Upstream,
    /// Client-side transport failure talking to the explanation endpoint
    Network,
}

/// Error types for the PDF explainer
#[derive(Error, Debug)]
pub enum Error {
    /// Request body has no usable `text` field
    #[error("Missing or empty \"text\" in request body")]
    MissingText,

    /// Request body is not valid JSON for an explain request
    #[error("Invalid request body: {reason}")]
    InvalidBody { reason: String },

    /// HTTP method other than POST on the explain endpoint
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// No API credential configured
    #[error("API credential is not configured")]
    MissingApiKey,

    /// Upstream answered with a non-success status
    #[error("Upstream API error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream answered 2xx but without a usable completion
    #[error("Malformed upstream response: {reason}")]
    UpstreamMalformed { reason: String },

    /// Explanation endpoint answered with a non-success status
    #[error("Explanation endpoint returned status {status}")]
    EndpointStatus { status: u16, message: Option<String> },

    /// Explanation endpoint answered 2xx without an `explanation` field
    #[error("Explanation endpoint returned no explanation")]
    EmptyExplanation,

    /// Static PDF could not be fetched
    #[error("Document unavailable: status {status}")]
    DocumentUnavailable { status: u16 },

    /// Invalid URL in configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error into the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingText | Error::InvalidBody { .. } | Error::MethodNotAllowed { .. } => {
                ErrorKind::Validation
            }
            Error::MissingApiKey | Error::InvalidUrl(_) | Error::Io(_) => ErrorKind::Configuration,
            Error::UpstreamStatus { .. }
            | Error::UpstreamMalformed { .. }
            | Error::Serialization(_) => ErrorKind::Upstream,
            Error::EndpointStatus { .. }
            | Error::EmptyExplanation
            | Error::DocumentUnavailable { .. }
            | Error::HttpRequest(_) => ErrorKind::Network,
        }
    }

    /// HTTP status the explain endpoint answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingText | Error::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Return a sanitized error message safe to send to clients.
    /// Upstream bodies, credentials and transport details are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::MissingText => MISSING_TEXT_MESSAGE.to_string(),
            Error::InvalidBody { .. } => "Invalid JSON request body.".to_string(),
            Error::MethodNotAllowed { .. } => "Method not allowed. Use POST.".to_string(),
            Error::MissingApiKey => "Explanation service is not configured.".to_string(),
            Error::UpstreamStatus { .. }
            | Error::UpstreamMalformed { .. }
            | Error::Serialization(_)
            | Error::HttpRequest(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
            Error::EndpointStatus { .. } | Error::EmptyExplanation => {
                UPSTREAM_FAILURE_MESSAGE.to_string()
            }
            Error::DocumentUnavailable { status } => {
                format!("PDF file not found. Status: {}", status)
            }
            Error::InvalidUrl(_) | Error::Io(_) => "Internal server error".to_string(),
        }
    }
}
