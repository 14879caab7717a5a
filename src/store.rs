//! Persistence for the last entered text and the last produced image.
//!
//! Only one result is kept; each save replaces the previous one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::rendering::RenderResult;
use crate::{Error, Result};

/// Reference to the most recent image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    /// A locally rendered card, identified by content hash
    Rendered {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<PathBuf>,
        sha256: String,
        width: u32,
        height: u32,
    },
    /// A picture hosted by the image-generation service
    Remote { url: String },
}

impl ImageRef {
    pub fn rendered(result: &RenderResult, file: Option<PathBuf>) -> Self {
        ImageRef::Rendered {
            file,
            sha256: result.digest(),
            width: result.width,
            height: result.height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub last_text: Option<String>,
    #[serde(default)]
    pub last_image: Option<ImageRef>,
}

pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<SavedState>;
    fn save(&self, state: &SavedState) -> Result<()>;
}

/// In-process store, used when no path is configured and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<SavedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<SavedState> {
        let g = self
            .state
            .lock()
            .map_err(|_| Error::StorageError("store lock poisoned".into()))?;
        Ok(g.clone())
    }

    fn save(&self, state: &SavedState) -> Result<()> {
        let mut g = self
            .state
            .lock()
            .map_err(|_| Error::StorageError("store lock poisoned".into()))?;
        *g = state.clone();
        Ok(())
    }
}

/// JSON file on disk. A missing file loads as the empty state.
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

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<SavedState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SavedState::default()),
            Err(e) => {
                return Err(Error::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, state: &SavedState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::StorageError(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(state)?;
        // Readers only ever see a complete file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| Error::StorageError(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| Error::StorageError(format!("Failed to replace {}: {}", self.path.display(), e)))?;
        log::debug!("saved state to {}", self.path.display());
        Ok(())
    }
}
