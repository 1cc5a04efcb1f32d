//! Durable storage for the preset record.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::PresetError;

/// Storage holding the serialized preset mapping under a single key.
pub trait PresetBackend {
    /// Reads the stored record, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage exists but cannot be read.
    fn read(&self) -> Result<Option<String>, PresetError>;

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn write(&self, contents: &str) -> Result<(), PresetError>;
}

/// Preset record kept in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// File name of the preset record.
    pub const FILE_NAME: &'static str = "presets.json";

    /// Creates a backend for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the per-user data location (`<data dir>/mailsheet/presets.json`).
    #[must_use]
    pub fn default_location() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailsheet")
            .join(Self::FILE_NAME);
        Self::new(path)
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PresetBackend for JsonFileBackend {
    fn read(&self) -> Result<Option<String>, PresetError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(contents))
    }

    fn write(&self, contents: &str) -> Result<(), PresetError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        debug!("Presets written to {:?}", self.path);
        Ok(())
    }
}

/// In-memory backend. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `contents`.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    /// Returns the stored record.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.record.lock().ok().and_then(|record| record.clone())
    }
}

impl PresetBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, PresetError> {
        self.record
            .lock()
            .map(|record| record.clone())
            .map_err(|e| PresetError::Unavailable(e.to_string()))
    }

    fn write(&self, contents: &str) -> Result<(), PresetError> {
        let mut record = self
            .record
            .lock()
            .map_err(|e| PresetError::Unavailable(e.to_string()))?;
        *record = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("presets.json"));
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("presets.json"));
        backend.write("{}").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_backend_clones_share_record() {
        let backend = MemoryBackend::new();
        let other = backend.clone();
        backend.write("{\"a\":{}}").unwrap();
        assert_eq!(other.contents().as_deref(), Some("{\"a\":{}}"));
    }
}
