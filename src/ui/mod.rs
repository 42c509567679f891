//! Modal screens
//!
//! Each screen owns its state and reports a status after every event; the
//! dispatcher in `app` decides what runs next.

pub mod game_over;
pub mod name_entry;

pub use game_over::{GameOverScreen, GameOverStatus};
pub use name_entry::{NameCapture, NameStatus};
