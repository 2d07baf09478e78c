//! Selection controller
//!
//! Client-side interaction logic: selection-mode toggling, one-at-a-time
//! submission of selections to the explanation endpoint, highlight history
//! and zoom. The viewer widget is reached only through [`SelectionSurface`].

mod api;
mod machine;
mod session;
mod state;
mod toggle;
mod zoom;

pub use api::{ExplainApi, HttpExplainClient};
pub use machine::{Command, Event, Ignored, SelectionController, GENERIC_FAILURE_MESSAGE};
pub use session::{SelectionSurface, Session};
pub use state::{
    HighlightPosition, HighlightRecord, InFlight, InteractionState, Phase, Rect, SelectionEvent,
    SelectionId,
};
pub use toggle::{KeyInput, ToggleDetector, ToggleGesture, DOUBLE_TAP_WINDOW};
pub use zoom::{ZoomScale, DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, ZOOM_STEP};

use crate::server::{DOCUMENT_PATH, EXPLAIN_PATH};

/// Client-side configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub gesture: ToggleGesture,
    /// Path of the explanation endpoint, relative to the server root
    pub endpoint: String,
    /// Path of the PDF the viewer loads
    pub document_url: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gesture: ToggleGesture::default(),
            endpoint: EXPLAIN_PATH.to_string(),
            document_url: DOCUMENT_PATH.to_string(),
        }
    }
}
