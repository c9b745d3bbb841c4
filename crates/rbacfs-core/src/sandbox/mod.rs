//! Role-based access control over file storage
//!
//! This module provides:
//! - The role registry and permission resolution
//! - The operation → permission policy table
//! - Storage backends and the guarded file store
//! - Lock-protected variants for multi-threaded callers

mod backend;
mod filesystem;
mod policy;
mod registry;
mod shared;

pub use backend::{LocalFileSystem, MemoryBackend, StorageBackend};
pub use filesystem::GuardedFileStore;
pub use policy::OperationPolicy;
pub use registry::AccessControlRegistry;
pub use shared::{PathLocks, SharedFileStore, SharedRegistry};
