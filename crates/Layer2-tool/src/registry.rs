//! Tool Registry - the fixed set of tools for a session
//!
//! Registration happens at construction time only; afterwards the registry
//! is read-only. Execution by name reports an unknown tool as a failed
//! result, never as a panic or a silent drop.

use crate::builtin;
use crate::{Tool, ToolDef, ToolResult};
use ember_core::{CommandExecutor, Workspace};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the standard nine tools bound to a workspace
    pub fn with_builtins(
        workspace: Arc<Workspace>,
        executor: Arc<CommandExecutor>,
        safe_mode: bool,
    ) -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(builtin::read::ReadFileTool::new(workspace.clone())));
        registry.register(Arc::new(builtin::create::CreateFileTool::new(
            workspace.clone(),
        )));
        registry.register(Arc::new(builtin::write::WriteFileTool::new(
            workspace.clone(),
        )));
        registry.register(Arc::new(builtin::list::ListFilesTool::new(workspace.clone())));
        registry.register(Arc::new(builtin::search::SearchCodeTool::new(
            workspace.clone(),
        )));
        registry.register(Arc::new(builtin::analyze::AnalyzeCodeTool::new(
            workspace.clone(),
        )));
        registry.register(Arc::new(builtin::run::RunCommandTool::new(
            executor, safe_mode,
        )));
        registry.register(Arc::new(builtin::tree::GetTreeTool::new(workspace.clone())));
        registry.register(Arc::new(builtin::info::FileInfoTool::new(workspace)));

        registry
    }

    /// Register a tool. Only called while building the registry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name (case-sensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool definitions, sorted by name so prompt construction and
    /// listings are deterministic
    pub fn definitions(&self) -> Vec<ToolDef> {
        let mut defs: Vec<ToolDef> = self.tools.values().map(|tool| tool.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// All tool names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, params: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(params).await,
            None => ToolResult::error(format!("Tool not found: {}", name)),
        }
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn registry(dir: &std::path::Path) -> ToolRegistry {
        let workspace = Arc::new(Workspace::new(dir, &[]).unwrap());
        let executor = Arc::new(CommandExecutor::new(dir));
        ToolRegistry::with_builtins(workspace, executor, false)
    }

    #[test]
    fn test_standard_registry_has_nine_tools() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.names(),
            vec![
                "analyze_code",
                "create_file",
                "file_info",
                "get_tree",
                "list_files",
                "read_file",
                "run_command",
                "search_code",
                "write_file",
            ]
        );
    }

    #[test]
    fn test_confirmation_classes() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());

        for def in registry.definitions() {
            let expected = matches!(def.name.as_str(), "create_file" | "write_file" | "run_command");
            assert_eq!(
                def.requires_confirmation, expected,
                "unexpected confirmation class for {}",
                def.name
            );
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_reports_not_found() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());

        let result = registry.execute("delete_everything", serde_json::json!({})).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Tool not found: delete_everything"));
    }

    #[test]
    fn test_tool_names_are_case_sensitive() {
        let dir = tempdir().unwrap();
        let registry = registry(dir.path());
        assert!(registry.contains("read_file"));
        assert!(!registry.contains("Read_File"));
    }
}
