//! ember-tool: Tool system for EmberCode
//!
//! A tool is a named capability with a parameter schema, a confirmation
//! class, and one execution method. The set of tools is fixed when the
//! registry is built and never changes for the lifetime of a session.

pub mod builtin;
pub mod registry;
pub mod r#trait;

pub use r#trait::{Tool, ToolDef, ToolDefBuilder, ToolParameters, ToolResult};
pub use registry::ToolRegistry;
