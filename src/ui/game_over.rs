//! Game-over summary screen

use crate::consts::{ARROW_FLASH_FRAMES, GAME_OVER_FLASH_FRAMES};
use crate::platform::input::InputEvent;

/// Result of feeding an event to the summary screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverStatus {
    Displaying,
    /// R pressed: start a new run
    Restarting,
    /// Escape or quit: leave the game
    Exiting,
}

/// Summary screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverScreen {
    pub final_score: u64,
    /// Beat the best score on the board before this run
    pub new_high_score: bool,
    /// Leaderboard row (1-indexed) holding this run's score
    pub highlight_rank: Option<usize>,
    /// Draw flashing elements steadily
    pub steady: bool,
    frames: u32,
}

impl GameOverScreen {
    pub fn new(final_score: u64, new_high_score: bool, highlight_rank: Option<usize>) -> Self {
        Self {
            final_score,
            new_high_score,
            highlight_rank,
            steady: false,
            frames: 0,
        }
    }

    pub fn with_steady(mut self, steady: bool) -> Self {
        self.steady = steady;
        self
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Advance one redraw frame
    pub fn advance_frame(&mut self) {
        self.frames = self.frames.wrapping_add(1);
    }

    /// GAME OVER text is shown during even flash phases
    pub fn flash_visible(&self) -> bool {
        self.steady || (self.frames / GAME_OVER_FLASH_FRAMES) % 2 == 0
    }

    /// Rank arrow blinks faster than the GAME OVER text
    pub fn arrow_visible(&self) -> bool {
        self.steady || (self.frames / ARROW_FLASH_FRAMES) % 2 == 0
    }

    pub fn handle(&mut self, event: &InputEvent) -> GameOverStatus {
        if event.is_restart() {
            GameOverStatus::Restarting
        } else if event.is_cancel() || *event == InputEvent::Quit {
            GameOverStatus::Exiting
        } else {
            GameOverStatus::Displaying
        }
    }
}
