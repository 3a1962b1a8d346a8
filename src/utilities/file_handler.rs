//! File handler utility for reading/writing JSON artifacts.
//!
//! Handles typed JSON files in a data directory: one file per named
//! artifact. Used by the profile store for `style_profile.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::utilities::errors::{Result, XposterError};

/// Reads and writes typed JSON data files in a directory.
#[derive(Debug, Clone)]
pub struct FileHandler {
    /// Directory for file storage.
    pub directory: PathBuf,
}

impl FileHandler {
    /// Create a new `FileHandler` for the given directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Load JSON data from a file in the handler's directory.
    ///
    /// Returns `Ok(None)` if the file does not exist. A file that exists
    /// but fails to parse is an error, not a missing artifact.
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.directory.join(filename);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content).map_err(|e| {
            XposterError::parse(format!("invalid JSON in {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    /// Save data as pretty-printed JSON to a file in the handler's directory.
    ///
    /// Creates the directory if it does not exist.
    pub fn save<T: Serialize>(&self, filename: &str, data: &T) -> Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(filename);
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| XposterError::parse(format!("failed to serialize {}: {}", filename, e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check if a file exists in the handler's directory.
    pub fn exists(&self, filename: &str) -> bool {
        self.directory.join(filename).exists()
    }

    /// Path of a file inside the handler's directory.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        Path::new(&self.directory).join(filename)
    }
}
