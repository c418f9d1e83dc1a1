//! Read tool - read file contents

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Read tool for reading file contents
pub struct ReadFileTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct ReadParams {
    filepath: String,
}

impl ReadFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("read_file", "Read the contents of a file")
            .string_param(
                "filepath",
                "Path to the file to read (relative to workspace)",
                true,
            )
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: ReadParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self.workspace.read_file(&params.filepath) {
            Ok(content) => {
                let size = content.len();
                ToolResult::success_with_metadata(
                    content,
                    serde_json::json!({ "filepath": params.filepath, "size": size }),
                )
            }
            Err(e) => ToolResult::error(format!("Failed to read file: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace.write_file("hello.txt", "hi there").unwrap();

        let tool = ReadFileTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"filepath": "hello.txt"}))
            .await;

        assert!(result.success);
        assert_eq!(result.output, "hi there");
        assert_eq!(result.metadata.unwrap()["size"], 8);
    }

    #[tokio::test]
    async fn test_read_outside_workspace_is_rejected() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());

        let tool = ReadFileTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"filepath": "../../etc/passwd"}))
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("outside workspace"));
    }

    #[tokio::test]
    async fn test_missing_required_parameter() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());

        let tool = ReadFileTool::new(workspace);
        let result = tool.execute(serde_json::json!({})).await;

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Invalid parameters"));
    }
}
