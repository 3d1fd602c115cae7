//! Durable storage for the clock registry.
//!
//! The registry is persisted as a single JSON object mapping clock name to
//! its flat [`ClockEntity`] record. [`JsonFileStore`] keeps that object in
//! one file, created lazily on the first save; a missing file on load
//! means "no clocks yet". [`MemoryStore`] keeps it in memory for tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clockface_types::ClockEntity;
use tracing::debug;

/// The persisted registry: clock name to record.
pub type ClockMap = BTreeMap<String, ClockEntity>;

/// Errors that can occur while loading or saving the registry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing, or creating the storage location failed.
    #[error("registry I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The stored registry could not be parsed or encoded.
    #[error("malformed registry data: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Load/save collaborator for the whole registry.
pub trait ClockStore {
    /// Load every stored clock. Returns an empty map when nothing has been
    /// saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if stored data exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<ClockMap, StoreError>;

    /// Replace the stored registry with `clocks`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data cannot be written.
    fn save(&mut self, clocks: &ClockMap) -> Result<(), StoreError>;
}

/// Registry persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path of the registry file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the file at `path`. Nothing is touched on disk
    /// until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the registry file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClockStore for JsonFileStore {
    fn load(&self) -> Result<ClockMap, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No registry file yet");
            return Ok(ClockMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, clocks: &ClockMap) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let serialized = serde_json::to_string(clocks)?;
        std::fs::write(&self.path, serialized).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), clocks = clocks.len(), "Registry saved");
        Ok(())
    }
}

/// Registry kept in memory, counting saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Last saved registry, if any.
    saved: Option<ClockMap>,
    /// Number of saves so far.
    saves: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            saved: None,
            saves: 0,
        }
    }

    /// Create a store that already holds `clocks`.
    pub const fn with_clocks(clocks: ClockMap) -> Self {
        Self {
            saved: Some(clocks),
            saves: 0,
        }
    }

    /// Last saved registry, if any.
    pub const fn saved(&self) -> Option<&ClockMap> {
        self.saved.as_ref()
    }

    /// Number of saves so far.
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl ClockStore for MemoryStore {
    fn load(&self) -> Result<ClockMap, StoreError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, clocks: &ClockMap) -> Result<(), StoreError> {
        self.saved = Some(clocks.clone());
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }
}
