/// Local JSON file sink for room layouts.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::history::SnapshotSink;
use crate::layout::RoomLayout;

/// Writes layouts as pretty-printed JSON to a fixed path.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// target.
#[derive(Debug, Clone)]
pub struct JsonLayoutFile {
    path: PathBuf,
}

impl JsonLayoutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the layout stored at this path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds invalid JSON.
    pub fn load(&self) -> Result<RoomLayout> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read layout: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse layout: {}", self.path.display()))
    }

    /// Writes `layout` to this path, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn write(&self, layout: &RoomLayout) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write layout: {}", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e)
                .with_context(|| format!("Failed to replace layout: {}", self.path.display()));
        }

        tracing::debug!("Saved layout to {}", self.path.display());
        Ok(())
    }
}

impl SnapshotSink<RoomLayout> for JsonLayoutFile {
    fn save(&mut self, snapshot: &RoomLayout) -> Result<()> {
        self.write(snapshot)
    }
}
