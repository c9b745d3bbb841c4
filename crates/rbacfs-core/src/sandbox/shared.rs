//! Thread-safe registry handle and path-locked file store
//!
//! For deployments where several threads act on behalf of different
//! users. Registry mutation goes through a write lock, and each guarded
//! operation holds a per-path lock across its existence check and the
//! storage call.

use super::backend::StorageBackend;
use super::filesystem::{authorize, not_found};
use super::policy::OperationPolicy;
use super::registry::AccessControlRegistry;
use crate::error::Result;
use crate::types::{FileOperation, Permission};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Cloneable handle to a registry shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AccessControlRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: AccessControlRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn define_role<I, P>(&self, name: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.inner.write().define_role(name, permissions);
    }

    pub fn assign_role(&self, user: &str, role: &str) -> Result<()> {
        self.inner.write().assign_role(user, role)
    }

    pub fn effective_permissions(&self, user: &str) -> HashSet<Permission> {
        self.inner.read().effective_permissions(user)
    }

    pub fn has_permission(&self, user: &str, permission: &str) -> bool {
        self.inner.read().has_permission(user, permission)
    }

    /// Run a closure against the registry under the read lock
    pub fn with<R>(&self, f: impl FnOnce(&AccessControlRegistry) -> R) -> R {
        f(&self.inner.read())
    }
}

/// Lock per path, held only while an operation on that path is running
///
/// Entries are created on first use and dropped again once no caller
/// holds or waits on them, so the map only tracks paths in flight.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `path`
    pub fn with_lock<R>(&self, path: &Path, f: impl FnOnce() -> R) -> R {
        let lock = self
            .locks
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        // Handles are only cloned under the map lock, so a count of two
        // (the map's and ours) means nobody else holds or awaits this path.
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(path);
        }

        result
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guarded file store usable from several threads at once
///
/// Same contract as [`GuardedFileStore`](super::GuardedFileStore), with the
/// permission check taken under the registry read lock and the rest of
/// the operation under the path lock.
pub struct SharedFileStore<B> {
    registry: SharedRegistry,
    policy: OperationPolicy,
    backend: B,
    path_locks: PathLocks,
}

impl<B: StorageBackend> SharedFileStore<B> {
    pub fn new(registry: SharedRegistry, policy: OperationPolicy, backend: B) -> Self {
        Self {
            registry,
            policy,
            backend,
            path_locks: PathLocks::new(),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn authorize(&self, user: &str, operation: FileOperation) -> Result<()> {
        self.registry
            .with(|registry| authorize(registry, &self.policy, user, operation))
    }

    pub fn create(&self, user: &str, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = path.as_ref();
        self.authorize(user, FileOperation::Create)?;

        self.path_locks.with_lock(path, || {
            debug!("Creating file: {:?}", path);
            self.backend.write_all(path, content)?;

            info!("File {:?} created by '{}'", path, user);
            Ok(())
        })
    }

    pub fn read(&self, user: &str, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        self.authorize(user, FileOperation::Read)?;

        self.path_locks.with_lock(path, || {
            if !self.backend.exists(path) {
                return Err(not_found(path));
            }
            Ok(self.backend.read_all(path)?)
        })
    }

    pub fn write(&self, user: &str, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = path.as_ref();
        self.authorize(user, FileOperation::Write)?;

        self.path_locks.with_lock(path, || {
            if !self.backend.exists(path) {
                return Err(not_found(path));
            }
            self.backend.write_all(path, content)?;

            info!("File {:?} updated by '{}'", path, user);
            Ok(())
        })
    }

    pub fn delete(&self, user: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.authorize(user, FileOperation::Delete)?;

        self.path_locks.with_lock(path, || {
            if !self.backend.exists(path) {
                return Err(not_found(path));
            }
            self.backend.remove(path)?;

            info!("File {:?} deleted by '{}'", path, user);
            Ok(())
        })
    }
}
