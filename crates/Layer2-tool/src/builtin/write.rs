//! Write tool - modify existing files

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Write tool for overwriting file contents
pub struct WriteFileTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct WriteParams {
    filepath: String,
    content: String,
}

impl WriteFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("write_file", "Write or modify content in an existing file")
            .string_param(
                "filepath",
                "Path to the file to write (relative to workspace)",
                true,
            )
            .string_param("content", "Content to write to the file", true)
            .requires_confirmation(true)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: WriteParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self.workspace.write_file(&params.filepath, &params.content) {
            Ok(()) => ToolResult::success_with_metadata(
                format!(
                    "Successfully wrote {} bytes to {}",
                    params.content.len(),
                    params.filepath
                ),
                serde_json::json!({
                    "filepath": params.filepath,
                    "bytes": params.content.len(),
                }),
            ),
            Err(e) => ToolResult::error(format!("Failed to write file: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_overwrite_semantics() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace.write_file("a.txt", "old content").unwrap();

        let tool = WriteFileTool::new(workspace.clone());
        let result = tool
            .execute(serde_json::json!({"filepath": "a.txt", "content": "new"}))
            .await;

        assert!(result.success);
        assert_eq!(workspace.read_file("a.txt").unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_outside_workspace_is_rejected() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());

        let tool = WriteFileTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"filepath": "../escape.txt", "content": "x"}))
            .await;

        assert!(!result.success);
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }
}
