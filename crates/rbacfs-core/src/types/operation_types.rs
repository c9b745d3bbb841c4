//! Guarded file operation types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File operations gated by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    Create,
    Read,
    Write,
    Delete,
}

impl FileOperation {
    pub const ALL: [FileOperation; 4] = [
        FileOperation::Create,
        FileOperation::Read,
        FileOperation::Write,
        FileOperation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileOperation::Create => "create",
            FileOperation::Read => "read",
            FileOperation::Write => "write",
            FileOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(FileOperation::Create),
            "read" => Ok(FileOperation::Read),
            "write" => Ok(FileOperation::Write),
            "delete" => Ok(FileOperation::Delete),
            other => Err(format!("unknown file operation: {}", other)),
        }
    }
}
