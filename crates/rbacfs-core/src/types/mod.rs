//! Core type definitions for rbacfs
//!
//! Shared types used by the registry, the operation policy and the
//! guarded file store.

mod operation_types;
mod role_types;

pub use operation_types::*;
pub use role_types::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque permission token granted by a role
///
/// Equality is exact string match. There is no namespace or wildcard
/// syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(pub String);

impl Permission {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trimmed, lowercased copy of the token
    pub fn normalized(&self) -> Self {
        Self(self.0.trim().to_lowercase())
    }
}

impl From<String> for Permission {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
