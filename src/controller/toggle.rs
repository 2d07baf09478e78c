//! Selection-mode toggle gestures

use std::time::{Duration, Instant};

/// Default window for double activation
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(500);

/// A key press as reported by the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Physical key code, e.g. `KeyE`
    pub code: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub at: Instant,
}

impl KeyInput {
    pub fn plain(code: &str, at: Instant) -> Self {
        Self {
            code: code.to_string(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            at,
        }
    }

    fn has_modifiers(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// Gesture that flips selection mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleGesture {
    /// Ctrl or Cmd, plus optional Shift, plus `code`; Alt is not inspected
    Chord { code: String, shift: bool },
    /// `code` pressed twice without modifiers within `window`
    DoubleTap { code: String, window: Duration },
}

impl Default for ToggleGesture {
    /// Ctrl/Cmd + Shift + E
    fn default() -> Self {
        ToggleGesture::Chord {
            code: "KeyE".to_string(),
            shift: true,
        }
    }
}

/// Recognizes the configured toggle gesture in a stream of key presses
#[derive(Debug, Clone, Default)]
pub struct ToggleDetector {
    gesture: ToggleGesture,
    last_tap: Option<Instant>,
}

impl ToggleDetector {
    pub fn new(gesture: ToggleGesture) -> Self {
        Self {
            gesture,
            last_tap: None,
        }
    }

    pub fn gesture(&self) -> &ToggleGesture {
        &self.gesture
    }

    /// Feed one key press. Returns true when the gesture completes; the
    /// caller should then swallow the key event.
    pub fn observe(&mut self, key: &KeyInput) -> bool {
        match &self.gesture {
            ToggleGesture::Chord { code, shift } => {
                (key.ctrl || key.meta) && key.shift == *shift && key.code == *code
            }
            ToggleGesture::DoubleTap { code, window } => {
                if key.code != *code || key.has_modifiers() {
                    self.last_tap = None;
                    return false;
                }
                match self.last_tap.take() {
                    Some(prev) if key.at.saturating_duration_since(prev) <= *window => true,
                    _ => {
                        self.last_tap = Some(key.at);
                        false
                    }
                }
            }
        }
    }
}
