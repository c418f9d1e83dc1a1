//! ember-core: Core runtime for EmberCode
//!
//! Layer2 - the sandboxed boundaries every tool operates through
//!
//! # Modules
//!
//! - `workspace`: file operations rooted at an immutable directory; every
//!   path is rejected if it resolves outside the root
//! - `exec`: external process execution with an optional allow-list and a
//!   hard timeout

pub mod exec;
pub mod workspace;

pub use exec::{CommandExecutor, CommandOutcome, COMMAND_TIMEOUT_SECS, SAFE_COMMAND_PREFIXES};
pub use workspace::{
    FileInfo, LineStats, SearchMatch, Workspace, WorkspaceError,
};
