//! Recent Directories Management
//!
//! Tracks recently scanned PDF directories and persists them to disk. The
//! list populates the quick-open buttons in the sidebar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of recent directories to track
const MAX_RECENT_DIRS: usize = 10;

/// Manages a list of recently scanned directories
#[derive(Debug, Clone)]
pub struct RecentDirs {
    /// Recent directory paths (most recent first)
    dirs: Vec<PathBuf>,
    /// Path to the persistence file
    storage_path: PathBuf,
}

impl RecentDirs {
    /// Creates a new RecentDirs manager
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            storage_path: Self::default_storage_path(),
        }
    }

    /// Creates a RecentDirs manager with a custom storage path (for testing)
    #[cfg(test)]
    pub fn with_storage_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            dirs: Vec::new(),
            storage_path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the default storage path for recent directories
    ///
    /// - macOS: ~/Library/Application Support/pdf-notes/recent_dirs.json
    /// - Linux: ~/.local/share/pdf-notes/recent_dirs.json
    /// - Windows: %APPDATA%\pdf-notes\recent_dirs.json
    fn default_storage_path() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("pdf-notes").join("recent_dirs.json")
        } else {
            // Fallback to current directory
            PathBuf::from("recent_dirs.json")
        }
    }

    /// Adds a directory to the recent list
    ///
    /// If the directory is already present it is moved to the front.
    /// The list is capped at MAX_RECENT_DIRS entries.
    pub fn add<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();

        self.dirs.retain(|p| p != &path);
        self.dirs.insert(0, path);
        self.dirs.truncate(MAX_RECENT_DIRS);
    }

    /// Returns the recent directories (most recent first)
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Clears all recent directories
    pub fn clear(&mut self) {
        self.dirs.clear();
    }

    /// Loads recent directories from disk
    pub fn load(&mut self) -> Result<(), RecentDirsError> {
        if !self.storage_path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(&self.storage_path).map_err(RecentDirsError::IoError)?;

        self.dirs = serde_json::from_str(&contents)
            .map_err(|e| RecentDirsError::ParseError(e.to_string()))?;

        // Drop directories that no longer exist
        self.dirs.retain(|p| p.is_dir());

        Ok(())
    }

    /// Saves recent directories to disk
    pub fn save(&self) -> Result<(), RecentDirsError> {
        // Ensure parent directory exists
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(RecentDirsError::IoError)?;
        }

        let json = serde_json::to_string_pretty(&self.dirs)
            .map_err(|e| RecentDirsError::ParseError(e.to_string()))?;
        fs::write(&self.storage_path, json).map_err(RecentDirsError::IoError)
    }
}

impl Default for RecentDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during recent directory operations
#[derive(Debug)]
pub enum RecentDirsError {
    /// I/O error reading or writing the list
    IoError(io::Error),
    /// JSON error reading or writing the list
    ParseError(String),
}

impl std::fmt::Display for RecentDirsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecentDirsError::IoError(e) => write!(f, "I/O error: {}", e),
            RecentDirsError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for RecentDirsError {}
