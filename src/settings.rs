//! Game settings and preferences
//!
//! Persisted separately from the leaderboard as `settings.json` in the data
//! directory. Every field has a default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Settings file name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Silence music and sound effects
    pub muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (GAME OVER text and rank arrow stop flashing)
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Fixed spawn seed for reproducible runs (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            show_fps: false,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from the data directory
    pub fn load() -> Self {
        match persistence::data_dir() {
            Ok(dir) => Self::load_from(&dir.join(SETTINGS_FILE)),
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Self {
        match persistence::read_json(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to the data directory (best effort)
    pub fn save(&self) {
        let result = persistence::data_dir().and_then(|dir| self.save_to(&dir.join(SETTINGS_FILE)));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        persistence::write_json(path, self)
    }
}
