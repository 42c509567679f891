//! Platform abstraction layer
//!
//! Handles frontend differences for:
//! - Input events (abstract events, held-key tracking)
//! - Presentation (terminal rasterizer)
//! - Audio cues (terminal bell)

pub mod input;
pub mod terminal;

pub use input::{InputEvent, Key, KeyState};
pub use terminal::{Terminal, TerminalAudio};
