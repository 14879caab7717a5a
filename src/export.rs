//! Saving and copying rendered cards

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rendering::RenderResult;
use crate::{Error, Result};

/// `word2pic_<unix millis>.png`
pub fn timestamped_filename(at: SystemTime) -> String {
    let millis = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("word2pic_{}.png", millis)
}

/// Write the PNG into `dir` under a timestamped name and return the path
pub fn save_to_dir(result: &RenderResult, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| Error::ExportError(format!("Failed to create {}: {}", dir.display(), e)))?;
    let path = dir.join(timestamped_filename(SystemTime::now()));
    fs::write(&path, &result.png_data)
        .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("saved {}x{} card to {}", result.width, result.height, path.display());
    Ok(path)
}

/// Destination for "copy image"
pub trait ClipboardSink: Send + Sync {
    fn copy_png(&self, png: &[u8]) -> Result<()>;
}

/// Keeps the last copied image in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<Vec<u8>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.last.lock().ok().and_then(|g| g.clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy_png(&self, png: &[u8]) -> Result<()> {
        let mut g = self
            .last
            .lock()
            .map_err(|_| Error::ExportError("clipboard lock poisoned".into()))?;
        *g = Some(png.to_vec());
        Ok(())
    }
}
