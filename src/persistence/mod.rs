//! Save/load persistence for small JSON files
//!
//! Features:
//! - Whole-file JSON documents (no partial or streamed access)
//! - Atomic replace (write `<file>.tmp`, then rename over the target)
//! - Data directory override via `MOTO_DODGE_DATA_DIR`
//! - Append-only log file (stderr belongs to the game screen)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "MOTO_DODGE_DATA_DIR";

/// Log file name inside the data directory
pub const LOG_FILE: &str = "moto-dodge.log";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No usable data directory")]
    NoDataDir,
}

impl PersistError {
    /// True when the file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Directory holding the leaderboard and settings files
pub fn data_dir() -> Result<PathBuf, PersistError> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => std::env::current_dir().map_err(|_| PersistError::NoDataDir),
    }
}

/// Open (creating if needed) a file for appending log lines
pub fn open_log_file(path: &Path) -> Result<fs::File, PersistError> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Read and parse a whole JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace a file with the JSON encoding of `value`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let io_err = |source: io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
