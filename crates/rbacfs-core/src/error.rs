//! Error types for rbacfs core

use crate::types::FileOperation;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rbacfs operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Role registry errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Role not found: {0}")]
    RoleNotFound(String),
}

/// Guarded file store errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SandboxError {
    #[error("Access denied: user '{user}' lacks '{permission}' required to {operation} files")]
    AccessDenied {
        user: String,
        operation: FileOperation,
        permission: String,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Storage backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// True when the error is an authorization denial
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::Sandbox(SandboxError::AccessDenied { .. }))
    }

    /// True when the error reports a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Sandbox(SandboxError::FileNotFound(_)))
    }

    /// True when the error reports a missing role
    pub fn is_role_not_found(&self) -> bool {
        matches!(self, Error::Registry(RegistryError::RoleNotFound(_)))
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
