//! # ember-foundation
//!
//! Foundation layer for EmberCode:
//! - Error: central error taxonomy shared by every layer
//! - Config: immutable session configuration (defaults, file, environment)

pub mod config;
pub mod error;

pub use config::{Config, ProviderKind, DEFAULT_IGNORE_PATTERNS};
pub use error::{Error, Result};
