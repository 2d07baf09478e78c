//! Selection controller state machine
//!
//! `SelectionController::apply` is a pure transition function: it updates
//! [`InteractionState`] and returns the side effects the caller must perform
//! as [`Command`]s. Nothing here touches the network or the viewer.

use super::state::{
    HighlightRecord, InFlight, InteractionState, Phase, SelectionEvent, SelectionId,
};
use super::toggle::{KeyInput, ToggleDetector, ToggleGesture};
use crate::error::Result;
use std::time::Instant;
use uuid::Uuid;

/// Message shown for any failed explanation request
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate explanation. Please try again.";

/// Input to the state machine
#[derive(Debug)]
pub enum Event {
    /// Raw key press; flips selection mode when it completes the toggle gesture
    Key(KeyInput),
    /// Explicit toggle, e.g. from a button
    ToggleSelectionMode,
    /// The viewer finished a drag selection
    SelectionFinished(SelectionEvent),
    /// The explanation request `request_id` completed
    Settled {
        request_id: Uuid,
        outcome: Result<String>,
    },
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Issue exactly one explanation request
    Submit { request_id: Uuid, text: String },
    /// Clear the visual selection in the viewer
    Dismiss(SelectionId),
    /// Enable or disable area selection in the viewer
    SetAreaSelection(bool),
    /// Re-render the highlight overlay from `state().highlights`
    RenderHighlights,
    /// Swallow the key event that completed the toggle gesture
    PreventDefault,
}

/// Why an event produced no transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    BlankSelection,
    SelectionModeOff,
    RequestPending,
    StaleSettlement,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: InteractionState,
    toggle: ToggleDetector,
}

impl SelectionController {
    pub fn new(gesture: ToggleGesture) -> Self {
        Self {
            state: InteractionState::default(),
            toggle: ToggleDetector::new(gesture),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn set_document_error(&mut self, error: Option<String>) {
        self.state.document_error = error;
    }

    /// Apply one event and return the side effects to perform, in order.
    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) => {
                if !self.toggle.observe(&key) {
                    return Vec::new();
                }
                let mut commands = vec![Command::PreventDefault];
                commands.extend(self.toggle_selection_mode());
                commands
            }
            Event::ToggleSelectionMode => self.toggle_selection_mode(),
            Event::SelectionFinished(selection) => match self.begin(selection) {
                Ok(command) => vec![command],
                Err(reason) => {
                    tracing::debug!(?reason, "selection ignored");
                    Vec::new()
                }
            },
            Event::Settled {
                request_id,
                outcome,
            } => self.settle(request_id, outcome),
            Event::ZoomIn => {
                self.state.zoom.zoom_in();
                Vec::new()
            }
            Event::ZoomOut => {
                self.state.zoom.zoom_out();
                Vec::new()
            }
            Event::ZoomReset => {
                self.state.zoom.reset();
                Vec::new()
            }
        }
    }

    fn toggle_selection_mode(&mut self) -> Vec<Command> {
        if self.state.is_pending() {
            tracing::debug!(reason = ?Ignored::RequestPending, "toggle ignored");
            return Vec::new();
        }
        self.state.selection_mode_enabled = !self.state.selection_mode_enabled;
        tracing::debug!(
            enabled = self.state.selection_mode_enabled,
            "selection mode toggled"
        );
        vec![Command::SetAreaSelection(self.state.selection_mode_enabled)]
    }

    fn begin(&mut self, selection: SelectionEvent) -> std::result::Result<Command, Ignored> {
        if selection.text.trim().is_empty() {
            return Err(Ignored::BlankSelection);
        }
        if self.state.is_pending() {
            return Err(Ignored::RequestPending);
        }
        if !self.state.selection_mode_enabled {
            return Err(Ignored::SelectionModeOff);
        }

        self.state.last_error = None;
        self.state.last_explanation = None;

        let request_id = Uuid::new_v4();
        let text = selection.text.clone();
        tracing::debug!(%request_id, selection = %selection.id, "submitting selection");
        self.state.phase = Phase::Submitting(InFlight {
            request_id,
            selection,
            started_at: Instant::now(),
        });

        Ok(Command::Submit { request_id, text })
    }

    fn settle(&mut self, request_id: Uuid, outcome: Result<String>) -> Vec<Command> {
        let in_flight = match &self.state.phase {
            Phase::Submitting(in_flight) if in_flight.request_id == request_id => {
                in_flight.clone()
            }
            _ => {
                tracing::warn!(%request_id, reason = ?Ignored::StaleSettlement, "settlement ignored");
                return Vec::new();
            }
        };

        self.state.phase = Phase::Idle;
        // single-shot: one selection per activation
        self.state.selection_mode_enabled = false;
        let elapsed_ms = in_flight.started_at.elapsed().as_millis() as u64;

        match outcome {
            Ok(explanation) => {
                tracing::info!(%request_id, elapsed_ms, "explanation received");
                let InFlight { selection, .. } = in_flight;
                let selection_id = selection.id;
                self.state.highlights.push(HighlightRecord {
                    position: selection.position,
                    text: selection.text,
                    created_at: chrono::Utc::now(),
                });
                self.state.last_explanation = Some(explanation);
                self.state.last_error = None;
                vec![
                    Command::SetAreaSelection(false),
                    Command::RenderHighlights,
                    Command::Dismiss(selection_id),
                ]
            }
            Err(e) => {
                tracing::warn!(%request_id, elapsed_ms, error = %e, "explanation request failed");
                self.state.last_explanation = None;
                self.state.last_error = Some(GENERIC_FAILURE_MESSAGE.to_string());
                vec![Command::SetAreaSelection(false)]
            }
        }
    }
}
