//! Info tool - file metadata

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Info tool for basic file metadata
pub struct FileInfoTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct InfoParams {
    filepath: String,
}

impl FileInfoTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for FileInfoTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("file_info", "Get information about a file")
            .string_param("filepath", "Path to the file", true)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: InfoParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self.workspace.file_info(&params.filepath) {
            Ok(info) => ToolResult::success_with_metadata(
                format!(
                    "File Information:\n\
                     Path: {}\n\
                     Size: {} bytes\n\
                     Extension: {}\n\
                     Type: {}\n",
                    info.path,
                    info.size,
                    info.extension,
                    if info.is_file { "File" } else { "Directory" },
                ),
                serde_json::json!({
                    "path": info.path,
                    "size": info.size,
                    "extension": info.extension,
                    "is_file": info.is_file,
                }),
            ),
            Err(e) => ToolResult::error(format!("File not found: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_info_output() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace.write_file("data.json", "{}").unwrap();

        let tool = FileInfoTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"filepath": "data.json"}))
            .await;

        assert!(result.success);
        assert!(result.output.contains("Size: 2 bytes"));
        assert!(result.output.contains("Type: File"));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());

        let tool = FileInfoTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"filepath": "missing.json"}))
            .await;

        assert!(!result.success);
    }
}
