//! Session driver: runs controller commands against the backend and the viewer

use super::api::ExplainApi;
use super::machine::{Command, Event, SelectionController};
use super::state::{HighlightRecord, InteractionState, SelectionId};
use super::ControllerConfig;
use crate::error::Error;
use std::collections::VecDeque;

/// Capabilities the PDF viewer widget exposes to the controller
pub trait SelectionSurface: Send {
    fn set_area_selection(&mut self, enabled: bool);

    fn render_highlights(&mut self, highlights: &[HighlightRecord]);

    /// Clear the visual selection `selection`
    fn dismiss(&mut self, selection: SelectionId);

    /// Suppress the host's default handling of the last key event
    fn prevent_default(&mut self) {}
}

pub struct Session<A, V> {
    controller: SelectionController,
    api: A,
    surface: V,
}

impl<A: ExplainApi, V: SelectionSurface> Session<A, V> {
    pub fn new(config: &ControllerConfig, api: A, surface: V) -> Self {
        Self {
            controller: SelectionController::new(config.gesture.clone()),
            api,
            surface,
        }
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Probe the document once and sync the viewer with the initial state.
    pub async fn start(&mut self) {
        let document_error = match self.api.check_document().await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "document availability check failed");
                if matches!(e, Error::DocumentUnavailable { .. }) {
                    Some(e.client_message())
                } else {
                    Some(format!("Error loading PDF: {}", e))
                }
            }
        };
        self.controller.set_document_error(document_error);

        let enabled = self.controller.state().selection_mode_enabled;
        self.surface.set_area_selection(enabled);
    }

    /// Apply `event` and run every resulting command to completion.
    ///
    /// A submission suspends here until the backend answers; the settlement
    /// is fed back into the controller before returning.
    pub async fn dispatch(&mut self, event: Event) {
        let mut queue: VecDeque<Command> = self.controller.apply(event).into();

        while let Some(command) = queue.pop_front() {
            match command {
                Command::Submit { request_id, text } => {
                    let outcome = self.api.explain(&text).await;
                    queue.extend(self.controller.apply(Event::Settled {
                        request_id,
                        outcome,
                    }));
                }
                Command::Dismiss(selection) => self.surface.dismiss(selection),
                Command::SetAreaSelection(enabled) => self.surface.set_area_selection(enabled),
                Command::RenderHighlights => {
                    self.surface
                        .render_highlights(&self.controller.state().highlights);
                }
                Command::PreventDefault => self.surface.prevent_default(),
            }
        }
    }
}
