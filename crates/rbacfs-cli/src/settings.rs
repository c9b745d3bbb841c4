//! Config file resolution and store construction
//!
//! Resolution order:
//!
//! 1. `--config <path>` (or `RBACFS_CONFIG`)
//! 2. `<config_dir>/rbacfs/config.json` when it exists
//! 3. Built-in defaults

use crate::shell::Shell;
use rbacfs_core::{GuardedFileStore, LocalFileSystem, RbacConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Platform config location, e.g. `~/.config/rbacfs/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rbacfs").join("config.json"))
}

/// Load the config named explicitly, else the default file, else defaults
///
/// A missing default file is not an error. An explicit path that cannot
/// be read or parsed is.
pub fn load_config(explicit: Option<&Path>) -> Result<RbacConfig> {
    if let Some(path) = explicit {
        return RbacConfig::load(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => RbacConfig::load(path),
        other => {
            debug!("No config file found (looked at {:?}), using defaults", other);
            Ok(RbacConfig::default())
        }
    }
}

/// Build a shell over the local filesystem from a loaded config
pub fn build_shell(config: &RbacConfig, root: Option<PathBuf>) -> Result<Shell<LocalFileSystem>> {
    let registry = config.build_registry()?;

    let backend = match root.or_else(|| config.root.clone()) {
        Some(root) => LocalFileSystem::new(root),
        None => LocalFileSystem::current_dir(),
    };
    info!("File root: {:?}", backend.root());

    Ok(Shell::new(GuardedFileStore::new(
        registry,
        config.policy.clone(),
        backend,
    )))
}
