//! High score leaderboard system
//!
//! Persisted as `{"scores": [...]}` in the data directory, tracks top 3 scores.
//! Older files stored a bare list of integers; those load as entries named
//! "Player".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_NAME, MAX_HIGH_SCORES, MAX_NAME_LEN};
use crate::persistence::{self, PersistError};

/// Leaderboard file name inside the data directory
pub const LEADERBOARD_FILE: &str = "leaderboard.json";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name (trimmed, 1-12 chars)
    pub name: String,
    /// Final score
    pub score: u64,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Clean a stored name: letters, digits and spaces only, trimmed, at most
/// 12 chars; "Player" when nothing is left
pub fn sanitize_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    let name: String = kept.trim().chars().take(MAX_NAME_LEN).collect();
    let name = name.trim_end();
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// True if `score` earns a place on the board
///
/// A tie with the lowest entry does not qualify.
pub fn qualifies(entries: &[HighScoreEntry], score: u64) -> bool {
    if entries.len() < MAX_HIGH_SCORES {
        return true;
    }
    entries
        .iter()
        .map(|e| e.score)
        .min()
        .map(|lowest| score > lowest)
        .unwrap_or(true)
}

/// Append, stable-sort descending by score, keep the top 3
pub fn merge(entries: &[HighScoreEntry], entry: HighScoreEntry) -> Vec<HighScoreEntry> {
    let mut merged = entries.to_vec();
    merged.push(entry);
    merged.sort_by(|a, b| b.score.cmp(&a.score));
    merged.truncate(MAX_HIGH_SCORES);
    merged
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, normalizing order and length
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut scores = Self::new();
        for entry in entries {
            scores.entries = merge(&scores.entries, entry);
        }
        scores
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        qualifies(&self.entries, score)
    }

    /// Add an entry, returning its 1-indexed rank if it stayed on the board
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let probe = entry.clone();
        self.entries = merge(&self.entries, entry);
        // Stable sort puts the newcomer after earlier equal scores
        self.entries
            .iter()
            .rposition(|e| *e == probe)
            .map(|i| i + 1)
    }

    /// Rank (1-indexed) of the first row holding `score`
    pub fn rank_of(&self, score: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.score == score).map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Either on-disk shape of the `scores` list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredScores {
    Entries(Vec<HighScoreEntry>),
    Legacy(Vec<u64>),
}

impl From<StoredScores> for Vec<HighScoreEntry> {
    fn from(stored: StoredScores) -> Self {
        match stored {
            StoredScores::Entries(entries) => entries,
            StoredScores::Legacy(scores) => scores
                .into_iter()
                .map(|score| HighScoreEntry::new(DEFAULT_NAME, score))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeaderboardFile {
    scores: StoredScores,
}

#[derive(Debug, Serialize)]
struct LeaderboardFileRef<'a> {
    scores: &'a [HighScoreEntry],
}

/// File-backed leaderboard storage
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the standard data directory
    pub fn in_data_dir() -> Result<Self, PersistError> {
        Ok(Self::new(persistence::data_dir()?.join(LEADERBOARD_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the board, surfacing storage errors
    pub fn try_load(&self) -> Result<HighScores, PersistError> {
        let file: LeaderboardFile = persistence::read_json(&self.path)?;
        let entries: Vec<HighScoreEntry> = file.scores.into();
        let entries = entries
            .into_iter()
            .map(|e| HighScoreEntry::new(sanitize_name(&e.name), e.score))
            .collect();
        Ok(HighScores::from_entries(entries))
    }

    /// Load high scores; missing or corrupt files give an empty board
    pub fn load(&self) -> HighScores {
        match self.try_load() {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable leaderboard: {}", e);
                HighScores::new()
            }
        }
    }

    /// Replace the stored board, surfacing storage errors
    pub fn try_save(&self, scores: &HighScores) -> Result<(), PersistError> {
        persistence::write_json(
            &self.path,
            &LeaderboardFileRef {
                scores: &scores.entries,
            },
        )
    }

    /// Save high scores (best effort)
    pub fn save(&self, scores: &HighScores) {
        match self.try_save(scores) {
            Ok(()) => log::info!("High scores saved ({} entries)", scores.entries.len()),
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
    }
}
