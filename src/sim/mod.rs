//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Spawn positions come from an injected `SpawnSource`
//! - Stable iteration order (oldest obstacle first)
//! - No rendering or platform dependencies

pub mod hitbox;
pub mod state;
pub mod tick;

pub use hitbox::Rect;
pub use state::{GameEvent, Obstacle, WorldState};
pub use tick::{SpawnSource, TickInput, TickOutcome, tick};
