//! Draw command types
//!
//! Screens describe a frame as a flat list of commands in play-area pixels.
//! Backends rasterize them however they like.

use glam::IVec2;

use crate::sim::Rect;

/// Straight RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Bitmap assets the game blits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// One full-screen road tile
    Road,
    Motorcycle,
    Car,
}

/// Which point of the text `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole target
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    /// Filled convex polygon
    Polygon {
        points: Vec<IVec2>,
        color: Color,
    },
    Sprite {
        kind: SpriteKind,
        rect: Rect,
    },
    Text {
        text: String,
        pos: IVec2,
        /// Font size in pixels
        size: u32,
        color: Color,
        anchor: Anchor,
    },
}

impl DrawCommand {
    pub fn text(
        text: impl Into<String>,
        pos: IVec2,
        size: u32,
        color: Color,
        anchor: Anchor,
    ) -> Self {
        DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            color,
            anchor,
        }
    }

    /// Text content, if this is a text command
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const SCORE: Color = [1.0, 0.0, 0.0, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const HINT: Color = [0.7, 0.7, 0.7, 1.0];
    pub const HIGHLIGHT: Color = [1.0, 1.0, 1.0, 0.2];
    pub const ARROW: Color = [1.0, 1.0, 0.2, 1.0];
    pub const BANNER: Color = [1.0, 0.85, 0.1, 1.0];
    pub const INPUT_BOX: Color = [0.15, 0.15, 0.2, 1.0];

    /// Medal tiers for leaderboard rows
    pub const GOLD: Color = [1.0, 0.84, 0.0, 1.0];
    pub const SILVER: Color = [0.75, 0.75, 0.75, 1.0];
    pub const BRONZE: Color = [0.8, 0.5, 0.2, 1.0];

    /// Medal color for a 1-indexed rank
    pub fn medal(rank: usize) -> Color {
        match rank {
            1 => GOLD,
            2 => SILVER,
            _ => BRONZE,
        }
    }
}
