//! rbacfs Core Library
//!
//! This crate provides the core functionality for rbacfs, including:
//! - Roles as named permission sets and users as multi-role holders
//! - Permission resolution as the union over a user's roles
//! - Create / read / write / delete gated by permission checks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      rbacfs-core                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  sandbox/      - Registry, policy, guarded store, backends  │
//! │  config.rs     - Startup configuration                      │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod sandbox;
pub mod types;

// Re-export commonly used types
pub use config::RbacConfig;
pub use error::{Error, Result};
pub use types::*;

// Re-export sandbox components
pub use sandbox::{
    AccessControlRegistry, GuardedFileStore, LocalFileSystem, MemoryBackend, OperationPolicy,
    PathLocks, SharedFileStore, SharedRegistry, StorageBackend,
};
