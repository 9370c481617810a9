//! File-backed match log.
//!
//! The log is either a JSON array of games (`*.json`, the shape the app
//! stores) or JSON Lines with one game per line (`*.jsonl`).

pub mod jsonl;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::Game;

/// Errors that can occur while reading the match log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout of a match log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    JsonArray,
    JsonLines,
}

impl LogFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => LogFormat::JsonLines,
            _ => LogFormat::JsonArray,
        }
    }
}

/// A match log stored in a single file.
#[derive(Debug, Clone)]
pub struct GameLog {
    path: PathBuf,
    format: LogFormat,
}

impl GameLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = LogFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every game in the log. A missing file is an empty log.
    pub fn load(&self) -> Result<Vec<Game>, StorageError> {
        if !self.exists() {
            debug!("No match log at {:?}, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let games: Vec<Game> = match self.format() {
            LogFormat::JsonLines => jsonl::read_lines(reader, &self.path)?,
            LogFormat::JsonArray => serde_json::from_reader(reader)?,
        };

        info!("Loaded {} games from {:?}", games.len(), self.path);
        Ok(games)
    }
}
