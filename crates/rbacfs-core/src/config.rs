//! Startup configuration
//!
//! A JSON document that supplies the operation policy and, optionally,
//! a set of roles and assignments to seed the registry with. Runtime
//! changes are never written back.

use crate::error::{ConfigError, Error, Result};
use crate::sandbox::{AccessControlRegistry, OperationPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RbacConfig {
    /// Base directory for relative file paths
    pub root: Option<PathBuf>,
    /// Required token per file operation
    pub policy: OperationPolicy,
    /// Trim and lowercase permission tokens
    pub normalize_tokens: bool,
    /// Roles to define at startup
    pub roles: BTreeMap<String, Vec<String>>,
    /// Role names to assign to each user at startup
    pub assignments: BTreeMap<String, Vec<String>>,
}

impl RbacConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| {
            Error::Config(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        })?;

        let config = serde_json::from_str(&raw).map_err(|source| {
            Error::Config(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        })?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Build a registry seeded with the configured roles and assignments
    ///
    /// Roles are defined before any assignment is made, so an assignment
    /// naming an undefined role fails with `RoleNotFound`.
    pub fn build_registry(&self) -> Result<AccessControlRegistry> {
        let mut registry = if self.normalize_tokens {
            AccessControlRegistry::with_normalization()
        } else {
            AccessControlRegistry::new()
        };

        for (role, permissions) in &self.roles {
            registry.define_role(role.clone(), permissions.iter().map(String::as_str));
        }

        for (user, roles) in &self.assignments {
            for role in roles {
                registry.assign_role(user, role)?;
            }
        }

        Ok(registry)
    }
}
