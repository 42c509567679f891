//! World state and core simulation types
//!
//! Everything the simulation step mutates lives here. The state is owned by
//! the running session and rebuilt from scratch on restart.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::hitbox::Rect;
use crate::consts::*;

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A car entered at the top of the road
    ObstacleSpawned { x: i32 },
    /// Score went up by one
    ScoreChanged(u64),
    /// Difficulty ramp crossed a threshold
    SpeedUp { road_speed: i32, obstacle_speed: i32 },
    /// Player hitbox touched a car hitbox
    Collision,
}

/// An oncoming car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner of the sprite
    pub pos: IVec2,
}

impl Obstacle {
    /// Spawn just above the visible road at the given x
    pub fn spawn_at(x: i32) -> Self {
        Self {
            pos: IVec2::new(x, -OBSTACLE_HEIGHT),
        }
    }

    /// Sprite size (same for every car)
    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT)
    }

    /// Visual rectangle
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size(),
        }
    }
}

/// Complete world state for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Top-left corner of the motorcycle sprite
    pub player_pos: IVec2,
    /// Lateral pixels per tick
    pub player_speed: i32,
    /// Active cars, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Vertical offsets of the two stacked road tiles
    pub road_offsets: [i32; 2],
    pub road_speed: i32,
    pub obstacle_speed: i32,
    pub score: u64,
    /// Ticks since the last point
    pub score_counter: u32,
    /// Ticks since the last spawn
    pub spawn_counter: u32,
    /// Set on the tick the player crashes
    pub collided: bool,
    /// Simulation ticks this run
    pub ticks: u64,
    /// Seconds survived (sum of tick durations)
    pub elapsed_secs: f32,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    /// Fresh run: centered player, empty road, base speeds
    pub fn new() -> Self {
        Self {
            player_pos: IVec2::new(PLAYER_START_X, PLAYER_Y),
            player_speed: PLAYER_SPEED,
            obstacles: Vec::new(),
            road_offsets: [0, -PLAY_HEIGHT],
            road_speed: BASE_ROAD_SPEED,
            obstacle_speed: BASE_OBSTACLE_SPEED,
            score: 0,
            score_counter: 0,
            spawn_counter: 0,
            collided: false,
            ticks: 0,
            elapsed_secs: 0.0,
        }
    }

    /// Restore initial values in place
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Visual rectangle of the motorcycle
    pub fn player_rect(&self) -> Rect {
        Rect {
            pos: self.player_pos,
            size: IVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    /// Largest x the player may reach
    #[inline]
    pub fn player_max_x(&self) -> i32 {
        PLAY_WIDTH - PLAYER_WIDTH
    }
}
