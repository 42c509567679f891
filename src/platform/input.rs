//! Abstract input events and held-key tracking
//!
//! Frontends translate their raw events into `InputEvent`s; screens never see
//! terminal or window types.

use crate::sim::TickInput;

/// Keys the game cares about beyond text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
}

/// One discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
    /// Printable character typed
    Char(char),
    /// Window closed / interrupt
    Quit,
}

impl InputEvent {
    /// Restart request on the game-over screen (R)
    pub fn is_restart(&self) -> bool {
        matches!(self, InputEvent::Char('r' | 'R'))
    }

    /// Cancel (Escape)
    pub fn is_cancel(&self) -> bool {
        matches!(self, InputEvent::Press(Key::Escape))
    }
}

/// Continuously held lateral keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Press(Key::Left) => self.left = true,
            InputEvent::Release(Key::Left) => self.left = false,
            InputEvent::Press(Key::Right) => self.right = true,
            InputEvent::Release(Key::Right) => self.right = false,
            _ => {}
        }
    }

    /// Forget everything held (screen changes)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }
}
