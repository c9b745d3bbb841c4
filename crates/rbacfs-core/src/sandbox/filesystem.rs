//! File operations gated by role permissions

use super::backend::{LocalFileSystem, StorageBackend};
use super::policy::OperationPolicy;
use super::registry::AccessControlRegistry;
use crate::error::{Error, Result, SandboxError};
use crate::types::FileOperation;
use std::path::Path;
use tracing::{debug, info, warn};

/// Check that `user` may perform `operation`, returning `AccessDenied` otherwise
pub(crate) fn authorize(
    registry: &AccessControlRegistry,
    policy: &OperationPolicy,
    user: &str,
    operation: FileOperation,
) -> Result<()> {
    let required = policy.required(operation);

    if registry.has_permission(user, required.as_str()) {
        return Ok(());
    }

    warn!("Access denied: user '{}' lacks '{}' for {}", user, required, operation);
    Err(Error::Sandbox(SandboxError::AccessDenied {
        user: user.to_string(),
        operation,
        permission: required.to_string(),
    }))
}

pub(crate) fn not_found(path: &Path) -> Error {
    Error::Sandbox(SandboxError::FileNotFound(path.to_string_lossy().to_string()))
}

/// File store that consults the registry before every storage call
///
/// Every operation runs in the same order: permission check, then
/// existence check, then the storage call. A denied caller never
/// reaches the backend and so learns nothing about the path.
pub struct GuardedFileStore<B = LocalFileSystem> {
    registry: AccessControlRegistry,
    policy: OperationPolicy,
    backend: B,
}

impl GuardedFileStore<LocalFileSystem> {
    /// Store over the local filesystem with the default operation policy
    pub fn local(registry: AccessControlRegistry) -> Self {
        Self::new(registry, OperationPolicy::default(), LocalFileSystem::current_dir())
    }
}

impl<B: StorageBackend> GuardedFileStore<B> {
    pub fn new(registry: AccessControlRegistry, policy: OperationPolicy, backend: B) -> Self {
        Self {
            registry,
            policy,
            backend,
        }
    }

    pub fn registry(&self) -> &AccessControlRegistry {
        &self.registry
    }

    /// Mutable access for role administration
    pub fn registry_mut(&mut self) -> &mut AccessControlRegistry {
        &mut self.registry
    }

    pub fn policy(&self) -> &OperationPolicy {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create or overwrite a file
    pub fn create(&self, user: &str, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = path.as_ref();
        authorize(&self.registry, &self.policy, user, FileOperation::Create)?;

        debug!("Creating file: {:?}", path);
        self.backend.write_all(path, content)?;

        info!("File {:?} created by '{}'", path, user);
        Ok(())
    }

    /// Read the full content of an existing file
    pub fn read(&self, user: &str, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        authorize(&self.registry, &self.policy, user, FileOperation::Read)?;

        if !self.backend.exists(path) {
            return Err(not_found(path));
        }

        debug!("Reading file: {:?}", path);
        Ok(self.backend.read_all(path)?)
    }

    /// Replace the content of an existing file
    pub fn write(&self, user: &str, path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = path.as_ref();
        authorize(&self.registry, &self.policy, user, FileOperation::Write)?;

        if !self.backend.exists(path) {
            return Err(not_found(path));
        }

        debug!("Writing file: {:?}", path);
        self.backend.write_all(path, content)?;

        info!("File {:?} updated by '{}'", path, user);
        Ok(())
    }

    /// Remove an existing file
    pub fn delete(&self, user: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        authorize(&self.registry, &self.policy, user, FileOperation::Delete)?;

        if !self.backend.exists(path) {
            return Err(not_found(path));
        }

        debug!("Deleting file: {:?}", path);
        self.backend.remove(path)?;

        info!("File {:?} deleted by '{}'", path, user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::backend::{MemoryBackend, MockStorageBackend};
    use super::*;
    use crate::error::StorageError;
    use tempfile::tempdir;

    fn editor_registry() -> AccessControlRegistry {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("admin", ["crear", "leer", "escribir", "eliminar"]);
        registry.define_role("editor", ["leer", "escribir"]);
        registry.assign_role("root", "admin").unwrap();
        registry.assign_role("alice", "editor").unwrap();
        registry
    }

    fn memory_store() -> GuardedFileStore<MemoryBackend> {
        GuardedFileStore::new(editor_registry(), OperationPolicy::default(), MemoryBackend::new())
    }

    #[test]
    fn test_create_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = GuardedFileStore::new(
            editor_registry(),
            OperationPolicy::default(),
            LocalFileSystem::new(dir.path()),
        );

        store.create("root", "doc.txt", "X").unwrap();
        assert_eq!(store.read("root", "doc.txt").unwrap(), "X");

        store.create("root", "doc.txt", "").unwrap();
        assert_eq!(store.read("root", "doc.txt").unwrap(), "");
    }

    #[test]
    fn test_local_store_uses_working_directory() {
        let store = GuardedFileStore::local(AccessControlRegistry::new());
        assert_eq!(store.backend().root(), Path::new(""));
        assert_eq!(store.policy(), &OperationPolicy::default());
        assert!(store.read("anyone", "Cargo.toml").unwrap_err().is_access_denied());
    }

    #[test]
    fn test_editor_scenario() {
        let store = memory_store();
        store.create("root", "plan.md", "draft").unwrap();

        let err = store.create("alice", "new.md", "hi").unwrap_err();
        assert!(err.is_access_denied());
        assert!(!store.backend().exists(Path::new("new.md")));

        assert_eq!(store.read("alice", "plan.md").unwrap(), "draft");
        store.write("alice", "plan.md", "final").unwrap();
        assert_eq!(store.read("root", "plan.md").unwrap(), "final");
    }

    #[test]
    fn test_denied_read_does_not_reveal_existence() {
        let store = memory_store();

        let err = store.read("mallory", "/does/not/exist").unwrap_err();
        assert!(err.is_access_denied());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_denial_never_touches_storage() {
        let mut backend = MockStorageBackend::new();
        backend.expect_exists().never();
        backend.expect_write_all().never();
        backend.expect_read_all().never();
        backend.expect_remove().never();

        let store = GuardedFileStore::new(editor_registry(), OperationPolicy::default(), backend);

        assert!(store.create("alice", "a.txt", "x").unwrap_err().is_access_denied());
        assert!(store.delete("alice", "a.txt").unwrap_err().is_access_denied());
        assert!(store.read("nobody", "a.txt").unwrap_err().is_access_denied());
        assert!(store.write("nobody", "a.txt", "x").unwrap_err().is_access_denied());
    }

    #[test]
    fn test_create_skips_existence_check() {
        let mut backend = MockStorageBackend::new();
        backend.expect_exists().never();
        backend.expect_write_all().times(1).returning(|_, _| Ok(()));

        let store = GuardedFileStore::new(editor_registry(), OperationPolicy::default(), backend);
        store.create("root", "a.txt", "x").unwrap();
    }

    #[test]
    fn test_write_missing_path_is_not_found() {
        let store = memory_store();

        let err = store.write("root", "missing.txt", "x").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.backend().exists(Path::new("missing.txt")));
    }

    #[test]
    fn test_delete_then_read_is_not_found() {
        let store = memory_store();
        store.create("root", "tmp.txt", "bye").unwrap();

        store.delete("root", "tmp.txt").unwrap();

        assert!(store.read("root", "tmp.txt").unwrap_err().is_not_found());
        assert!(store.delete("root", "tmp.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_storage_failure_is_surfaced() {
        let mut backend = MockStorageBackend::new();
        backend.expect_exists().returning(|_| true);
        backend.expect_read_all().returning(|p| {
            Err(StorageError::Io {
                path: p.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let store = GuardedFileStore::new(editor_registry(), OperationPolicy::default(), backend);

        let err = store.read("alice", "locked.txt").unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Io { .. })));
    }

    #[test]
    fn test_custom_policy_tokens() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("reader", ["read"]);
        registry.assign_role("bob", "reader").unwrap();

        let policy = OperationPolicy::new("create", "read", "write", "delete");
        let store = GuardedFileStore::new(registry, policy, MemoryBackend::new());
        store.backend().write_all(Path::new("r.txt"), "ok").unwrap();

        assert_eq!(store.read("bob", "r.txt").unwrap(), "ok");
        match store.write("bob", "r.txt", "no").unwrap_err() {
            Error::Sandbox(SandboxError::AccessDenied { permission, operation, .. }) => {
                assert_eq!(permission, "write");
                assert_eq!(operation, FileOperation::Write);
            }
            other => panic!("Expected AccessDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_role_changes_apply_on_next_call() {
        let mut store = memory_store();
        assert!(store.create("alice", "a.txt", "").unwrap_err().is_access_denied());

        store
            .registry_mut()
            .define_role("editor", ["crear", "leer", "escribir"]);

        store.create("alice", "a.txt", "now allowed").unwrap();
        assert_eq!(store.read("alice", "a.txt").unwrap(), "now allowed");
    }
}
