//! Snapshot store - persists a session between runs.
//!
//! The engine only needs "load at start, save after each mutation, last write
//! wins". [`FileStore`] keeps one JSON document on disk; [`MemoryStore`] keeps
//! it in memory for tests and embedding hosts.
//!
//! # Environment Variables
//!
//! - `TILES_STATE_PATH`: snapshot file (default: `<local data dir>/tiles/state.json`)

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use tiles_core::{GameSnapshot, GameState, SeedSource, SnapshotError};

pub use tiles_core as core;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Persistence for one session snapshot.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<GameSnapshot>, StoreError>;
    fn save(&mut self, snapshot: &GameSnapshot) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub state_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let state_path = std::env::var("TILES_STATE_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
            .unwrap_or_else(default_state_path);

        Self { state_path }
    }
}

/// `<local data dir>/tiles/state.json`, falling back to the working directory.
pub fn default_state_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tiles");
    path.push("state.json");
    path
}

/// JSON snapshot file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.state_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<GameSnapshot>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        debug!("loaded snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target and rename so readers never see a partial file.
        let tmp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, snapshot)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!("saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<GameSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<GameSnapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.snapshot = None;
        Ok(())
    }
}

/// Restore the stored session, or start a new one if nothing is stored.
///
/// A fresh session is saved immediately.
pub fn open_session(
    store: &mut impl SnapshotStore,
    seeds: &mut impl SeedSource,
) -> Result<GameState, StoreError> {
    if let Some(snapshot) = store.load()? {
        let state = GameState::restore(&snapshot)?;
        info!(
            "resumed session seed={} moves={} score={}",
            state.seed(),
            state.moves().len(),
            state.score()
        );
        return Ok(state);
    }

    let state = GameState::new(seeds.next_seed());
    store.save(&state.snapshot())?;
    Ok(state)
}

/// Best score recorded in the store, 0 if none.
pub fn stored_best_score(store: &impl SnapshotStore) -> Result<u32, StoreError> {
    Ok(store.load()?.map(|s| s.best_score).unwrap_or(0))
}
