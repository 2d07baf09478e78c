//! Interaction state owned by the selection controller

use super::zoom::ZoomScale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Identifies one selection made in the viewer, so it can be dismissed later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionId(Uuid);

impl SelectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SelectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounding box of a selection, in viewer page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Where a selection sits in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightPosition {
    /// Page number (1-indexed)
    pub page: u32,
    pub bounding_rect: Rect,
    /// Per-line rectangles for multi-line text selections
    #[serde(default)]
    pub rects: Vec<Rect>,
}

/// A finished selection reported by the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub id: SelectionId,
    pub position: HighlightPosition,
    pub text: String,
}

impl SelectionEvent {
    pub fn new(position: HighlightPosition, text: impl Into<String>) -> Self {
        Self {
            id: SelectionId::new(),
            position,
            text: text.into(),
        }
    }
}

/// A selection that was successfully explained
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightRecord {
    pub position: HighlightPosition,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The request currently awaiting an answer
#[derive(Debug, Clone)]
pub struct InFlight {
    pub request_id: Uuid,
    pub selection: SelectionEvent,
    pub started_at: Instant,
}

/// Controller phase
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting(InFlight),
}

/// Everything the UI renders from
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub selection_mode_enabled: bool,
    pub phase: Phase,
    pub last_error: Option<String>,
    pub last_explanation: Option<String>,
    pub zoom: ZoomScale,
    /// Insertion-ordered, never mutated after append
    pub highlights: Vec<HighlightRecord>,
    /// Set when the startup availability probe of the PDF fails
    pub document_error: Option<String>,
}

impl InteractionState {
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        match &self.phase {
            Phase::Submitting(in_flight) => Some(in_flight),
            Phase::Idle => None,
        }
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom.value()
    }

    /// Indicator text for the selection-mode banner
    pub fn mode_hint(&self, platform_is_mac: bool) -> String {
        if self.selection_mode_enabled {
            "Selection Mode Active - Click and drag to select text".to_string()
        } else {
            let modifier = if platform_is_mac { "⌘" } else { "Ctrl" };
            format!(
                "Selection Mode Inactive - Press {} + Shift + E to activate",
                modifier
            )
        }
    }
}
