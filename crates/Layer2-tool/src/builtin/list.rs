//! List tool - list workspace files

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// List tool for enumerating workspace files
pub struct ListFilesTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default = "default_pattern")]
    pattern: String,
    #[serde(default = "default_recursive")]
    recursive: bool,
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_recursive() -> bool {
    true
}

impl ListFilesTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("list_files", "List files in the workspace matching a pattern")
            .string_param("pattern", "Glob pattern to match files (default: *)", false)
            .boolean_param("recursive", "Search recursively (default: true)", false)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: ListParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let files = self.workspace.list_files(&params.pattern, params.recursive);
        let output: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        ToolResult::success_with_metadata(
            output.join("\n"),
            serde_json::json!({ "count": files.len(), "pattern": params.pattern }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_list_with_default_pattern() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace.write_file("a.rs", "").unwrap();
        workspace.write_file("b.txt", "").unwrap();

        let tool = ListFilesTool::new(workspace);
        let result = tool.execute(serde_json::json!({})).await;

        assert!(result.success);
        assert_eq!(result.output, "a.rs\nb.txt");
        assert_eq!(result.metadata.unwrap()["count"], 2);
    }
}
