//! Moto Dodge - A scrolling-road dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, scoring)
//! - `highscores`: Top-3 leaderboard and its on-disk store
//! - `ui`: Name entry and game-over screens as explicit state machines
//! - `render`: Draw-command description of each screen
//! - `platform`: Input translation and the terminal frontend
//! - `persistence`: JSON file storage

pub mod app;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod ui;

pub use app::{Control, Game, Screen};
pub use highscores::{HighScoreEntry, HighScoreStore, HighScores};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Redraw rate of the modal screens (game over, name entry)
    pub const MODAL_RATE: u32 = 30;

    /// Play area dimensions
    pub const PLAY_WIDTH: i32 = 450;
    pub const PLAY_HEIGHT: i32 = 640;

    /// Player sprite (75x120 scaled by 0.75)
    pub const PLAYER_WIDTH: i32 = 56;
    pub const PLAYER_HEIGHT: i32 = 90;
    /// Player rides 10px above the bottom edge
    pub const PLAYER_Y: i32 = PLAY_HEIGHT - PLAYER_HEIGHT - 10;
    pub const PLAYER_START_X: i32 = PLAY_WIDTH / 2 - PLAYER_WIDTH / 2;
    pub const PLAYER_SPEED: i32 = 5;

    /// Oncoming car sprite (90x140 scaled by 0.75)
    pub const OBSTACLE_WIDTH: i32 = 67;
    pub const OBSTACLE_HEIGHT: i32 = 105;

    pub const BASE_ROAD_SPEED: i32 = 4;
    pub const BASE_OBSTACLE_SPEED: i32 = 3;

    /// A car spawns once the spawn counter exceeds this
    pub const SPAWN_THRESHOLD: u32 = 40;
    /// Non-colliding ticks per point
    pub const SCORE_INTERVAL: u32 = 8;
    /// Both speeds go up by one at every multiple of this score
    pub const SPEED_UP_EVERY: u64 = 50;

    /// Hitbox is 4/5 of the sprite in each dimension
    pub const HITBOX_NUM: i32 = 4;
    pub const HITBOX_DEN: i32 = 5;

    /// Leaderboard
    pub const MAX_HIGH_SCORES: usize = 3;
    pub const MAX_NAME_LEN: usize = 12;
    pub const DEFAULT_NAME: &str = "Player";

    /// Modal frames per GAME OVER flash phase
    pub const GAME_OVER_FLASH_FRAMES: u32 = 30;
    /// Modal frames per leaderboard arrow flash phase
    pub const ARROW_FLASH_FRAMES: u32 = 8;
}
