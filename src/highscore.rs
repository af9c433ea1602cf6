//! High score persistence
//!
//! The engine only ever needs one number: the best score seen so far. It
//! lives in LocalStorage on wasm32 and in a small JSON file natively.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the score is stored under (LocalStorage key / default file stem)
pub const STORAGE_KEY: &str = "maze_chase_highscore";

/// Errors while reading or writing the stored high score
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed high score record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("high score storage unavailable: {0}")]
    Unavailable(String),
}

/// Serialized record, `{ "high_score": n }`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// Somewhere to keep the high score between sessions
pub trait HighScoreStore {
    /// Stored score; `Ok(0)` when nothing has been written yet
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    score: Cell<u64>,
    writes: Cell<u32>,
}

impl MemoryStore {
    pub fn new(score: u64) -> Self {
        Self {
            score: Cell::new(score),
            writes: Cell::new(0),
        }
    }

    /// Number of `save` calls so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.score.get())
    }

    fn save(&self, score: u64) -> Result<(), StoreError> {
        self.score.set(score);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u64, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save(&self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        std::fs::write(&self.path, json)?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str::<HighScoreRecord>(&json)?.high_score),
            Ok(None) => Ok(0),
            Err(e) => Err(StoreError::Unavailable(format!("{:?}", e))),
        }
    }

    fn save(&self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        Self::storage()?
            .set_item(STORAGE_KEY, &json)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// Read the stored score, treating anything unreadable as no score
pub fn load_or_zero(store: &impl HighScoreStore) -> u64 {
    match store.load() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Ignoring stored high score: {}", e);
            0
        }
    }
}
