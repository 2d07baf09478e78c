//! PDF Explainer Library
//!
//! Select a passage in a PDF and get a plain-language explanation:
//! - `controller`: client-side selection state machine and session driver
//! - `explain`: the `/api/explain` service logic and wire types
//! - `llm`: the single call site for the hosted chat-completion API
//! - `server`: axum router, configuration and entry points

pub mod controller;
pub mod error;
pub mod explain;
pub mod llm;
pub mod server;

pub use error::{Error, ErrorKind, Result};
pub use explain::{ExplainRequest, ExplainResponse, ExplanationService};
pub use server::{build_router, run_server, run_server_with_config, ServerConfig};
