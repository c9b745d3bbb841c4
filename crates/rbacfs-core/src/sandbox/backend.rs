//! Storage backends behind the guarded file store

use crate::error::StorageError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw file storage consulted only after authorization succeeds
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend {
    fn exists(&self, path: &Path) -> bool;

    /// Write the full content, creating or truncating the file
    fn write_all(&self, path: &Path, content: &str) -> Result<(), StorageError>;

    fn read_all(&self, path: &Path) -> Result<String, StorageError>;

    fn remove(&self, path: &Path) -> Result<(), StorageError>;
}

/// Local filesystem backend
///
/// Relative paths resolve against `root`. Paths are passed through
/// unchanged otherwise: `..` components and absolute paths are not
/// confined to `root`.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Backend rooted at the process working directory
    pub fn current_dir() -> Self {
        Self::new(PathBuf::new())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::current_dir()
    }
}

fn io_error(path: PathBuf, source: std::io::Error) -> StorageError {
    StorageError::Io { path, source }
}

impl StorageBackend for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn write_all(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let path = self.resolve(path);
        debug!("Writing {} bytes to {:?}", content.len(), path);
        std::fs::write(&path, content).map_err(|e| io_error(path, e))
    }

    fn read_all(&self, path: &Path) -> Result<String, StorageError> {
        let path = self.resolve(path);
        debug!("Reading file: {:?}", path);
        let bytes = std::fs::read(&path).map_err(|e| io_error(path.clone(), e))?;
        String::from_utf8(bytes)
            .map_err(|_| StorageError::Encoding(path.to_string_lossy().to_string()))
    }

    fn remove(&self, path: &Path) -> Result<(), StorageError> {
        let path = self.resolve(path);
        debug!("Removing file: {:?}", path);
        std::fs::remove_file(&path).map_err(|e| io_error(path, e))
    }
}

/// Process-local backend holding file contents in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl StorageBackend for MemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn write_all(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_all(&self, path: &Path) -> Result<String, StorageError> {
        self.files.lock().get(path).cloned().ok_or_else(|| StorageError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }

    fn remove(&self, path: &Path) -> Result<(), StorageError> {
        match self.files.lock().remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}
