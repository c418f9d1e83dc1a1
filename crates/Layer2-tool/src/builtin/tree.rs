//! Tree tool - directory tree

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Tree tool for a depth-bounded directory listing
pub struct GetTreeTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct TreeParams {
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

fn default_max_depth() -> usize {
    3
}

impl GetTreeTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for GetTreeTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("get_tree", "Get directory tree structure")
            .integer_param("max_depth", "Maximum depth to traverse (default: 3)", false)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: TreeParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        ToolResult::success_with_metadata(
            self.workspace.get_tree(params.max_depth),
            serde_json::json!({ "max_depth": params.max_depth }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_tree_lists_entries() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace.write_file("src/main.rs", "").unwrap();

        let tool = GetTreeTool::new(workspace);
        let result = tool.execute(serde_json::json!({})).await;

        assert!(result.success);
        assert!(result.output.contains("src"));
        assert!(result.output.contains("main.rs"));
    }
}
