//! High score persistence
//!
//! The only state that outlives a session is a single integer. It is stored
//! as a one-field JSON document so the file stays readable and can grow new
//! fields without breaking older copies.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Somewhere the best score survives between runs
pub trait HighScoreStore {
    /// Read the stored high score; absent or unreadable data reads as 0
    fn load(&self) -> u32;

    /// Persist a new high score
    fn save(&self, high_score: u32) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Stores the high score as JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> u32 {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "could not read high score, using 0");
                return 0;
            }
        };

        match serde_json::from_str::<HighScoreRecord>(&json) {
            Ok(record) => record.high_score,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "corrupt high score file, using 0");
                0
            }
        }
    }

    fn save(&self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })
            .context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// Keeps the high score in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    high_score: Cell<u32>,
    saves: Cell<u32>,
}

impl MemoryStore {
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score: Cell::new(high_score),
            saves: Cell::new(0),
        }
    }

    /// Number of times `save` was called
    pub fn saves(&self) -> u32 {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.high_score.get()
    }

    fn save(&self, high_score: u32) -> Result<()> {
        self.high_score.set(high_score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("high_score.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("high_score.json");
        let store = JsonFileStore::new(&path);
        assert_eq!(store.path(), path.as_path());

        store.save(42).unwrap();
        assert!(path.exists());
        assert_eq!(store.load(), 42);

        // A fresh store pointing at the same file sees the value
        assert_eq!(JsonFileStore::new(&path).load(), 42);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("high_score.json");

        std::fs::write(&path, "not json at all").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), 0);

        std::fs::write(&path, r#"{ "high_score": -3 }"#).unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), 0);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryStore::new(7);
        assert_eq!(store.load(), 7);

        store.save(9).unwrap();
        assert_eq!(store.load(), 9);
        assert_eq!(store.saves(), 1);
    }
}
