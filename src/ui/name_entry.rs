//! Player name capture after a qualifying run

use crate::consts::{DEFAULT_NAME, MAX_NAME_LEN};
use crate::platform::input::{InputEvent, Key};

/// Result of feeding an event to the name prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameStatus {
    /// Still typing
    Composing,
    /// Enter pressed with a non-blank name (trimmed)
    Accepted(String),
    /// Escape or quit; carries the default name
    Skipped(String),
}

impl NameStatus {
    /// Name to record, if the prompt is finished
    pub fn name(&self) -> Option<&str> {
        match self {
            NameStatus::Composing => None,
            NameStatus::Accepted(name) | NameStatus::Skipped(name) => Some(name.as_str()),
        }
    }
}

/// Name prompt state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCapture {
    buffer: String,
    /// Redraw frames since the prompt opened (caret blink)
    frames: u32,
}

impl NameCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text typed so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Advance one redraw frame
    pub fn advance_frame(&mut self) {
        self.frames = self.frames.wrapping_add(1);
    }

    pub fn handle(&mut self, event: &InputEvent) -> NameStatus {
        match *event {
            InputEvent::Char(c) => {
                if (c.is_alphanumeric() || c == ' ')
                    && self.buffer.chars().count() < MAX_NAME_LEN
                {
                    self.buffer.push(c);
                }
                NameStatus::Composing
            }
            InputEvent::Press(Key::Backspace) => {
                self.buffer.pop();
                NameStatus::Composing
            }
            InputEvent::Press(Key::Enter) => {
                let name = self.buffer.trim();
                if name.is_empty() {
                    NameStatus::Composing
                } else {
                    NameStatus::Accepted(name.to_string())
                }
            }
            InputEvent::Press(Key::Escape) | InputEvent::Quit => {
                NameStatus::Skipped(DEFAULT_NAME.to_string())
            }
            _ => NameStatus::Composing,
        }
    }
}
