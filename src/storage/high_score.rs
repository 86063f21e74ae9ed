//! High-score persistence
//!
//! The game only ever reads the stored value once at startup and writes it
//! back when a round beats it. The file backend keeps a small JSON record:
//!
//! ```json
//! { "high_score": 12, "version": "0.1.0" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// A place that remembers the best score between sessions
pub trait ScoreStore {
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&mut self, high_score: u32) -> Result<(), StoreError>;
}

/// Keeps the high score for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    high_score: u32,
}

impl MemoryScoreStore {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), StoreError> {
        self.high_score = high_score;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
    version: String,
}

/// Stores the high score as JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileScoreStore {
    /// A missing file means nobody has scored yet
    fn load(&self) -> Result<u32, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let record = HighScoreRecord {
            high_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }
}
