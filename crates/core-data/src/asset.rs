//! Asset sources and the lazy single-flight table wrapper.
//!
//! Contract:
//! - A [`LazyTable`] runs its loader at most once per process lifetime, no
//!   matter how many callers race on `ensure_loaded`. Late callers block until
//!   the first load resolves and then share its result.
//! - A failed load is terminal (`LoadState::Failed`); lookups keep returning
//!   nothing and the loader is never re-run.
//! - `try_get` never blocks and never triggers a load.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Somewhere a JSON table can be read from.
pub trait AssetSource: Send + Sync {
    fn name(&self) -> &str;
    fn read(&self) -> Result<String, AssetError>;
}

/// JSON table on disk.
#[derive(Debug, Clone)]
pub struct FileAsset {
    path: PathBuf,
    name: String,
}

impl FileAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl AssetSource for FileAsset {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<String, AssetError> {
        fs::read_to_string(&self.path).map_err(|source| AssetError::Io {
            name: self.name.clone(),
            source,
        })
    }
}

/// JSON table held in memory (tests, embedded defaults).
#[derive(Debug, Clone)]
pub struct InlineAsset {
    name: String,
    json: String,
}

impl InlineAsset {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }
}

impl AssetSource for InlineAsset {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<String, AssetError> {
        Ok(self.json.clone())
    }
}

/// Read and deserialize a JSON asset.
pub fn read_json<T: DeserializeOwned>(source: &dyn AssetSource) -> Result<T, AssetError> {
    let raw = source.read()?;
    serde_json::from_str(&raw).map_err(|source_err| AssetError::Parse {
        name: source.name().to_string(),
        source: source_err,
    })
}

// ---------------------------------------------------------------------------
// LazyTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => LoadState::Loading,
            2 => LoadState::Loaded,
            3 => LoadState::Failed,
            _ => LoadState::Unloaded,
        }
    }
}

pub struct LazyTable<T> {
    cell: OnceLock<Option<T>>,
    state: AtomicU8,
    loads: AtomicU64,
}

impl<T> Default for LazyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyTable<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            state: AtomicU8::new(LoadState::Unloaded as u8),
            loads: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of times the loader actually ran (0 or 1).
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Loaded value, if any, without blocking.
    pub fn try_get(&self) -> Option<&T> {
        self.cell.get().and_then(Option::as_ref)
    }

    /// Run `load` once (single-flight) and return the shared result.
    pub fn ensure_loaded<F>(&self, name: &str, load: F) -> Option<&T>
    where
        F: FnOnce() -> Result<T, AssetError>,
    {
        self.cell
            .get_or_init(|| {
                self.loads.fetch_add(1, Ordering::Relaxed);
                self.state
                    .store(LoadState::Loading as u8, Ordering::Release);
                match load() {
                    Ok(value) => {
                        self.state.store(LoadState::Loaded as u8, Ordering::Release);
                        info!(target: "assets", name, "asset_loaded");
                        Some(value)
                    }
                    Err(e) => {
                        self.state.store(LoadState::Failed as u8, Ordering::Release);
                        error!(target: "assets", name, error = %e, "asset_load_failed");
                        None
                    }
                }
            })
            .as_ref()
    }
}
