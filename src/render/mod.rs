//! Rendering description module
//!
//! Turns world and screen state into backend-neutral draw commands.

pub mod commands;
pub mod scene;

pub use commands::{Anchor, Color, DrawCommand, SpriteKind, colors};
