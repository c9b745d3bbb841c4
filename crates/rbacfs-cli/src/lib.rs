//! rbacfs interactive shell
//!
//! Thin presentation layer over `rbacfs-core`: parses command lines,
//! calls into the guarded file store, and renders the results.

pub mod console;
pub mod settings;
pub mod shell;

pub use console::Console;
pub use shell::{Command, Reply, Shell};
