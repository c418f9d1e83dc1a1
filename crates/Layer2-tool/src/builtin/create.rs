//! Create tool - create new files

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Create tool for new files; the model decides the name
pub struct CreateFileTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    filepath: String,
    content: String,
    #[serde(default)]
    reason: String,
}

impl CreateFileTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "create_file",
            "Create a new file with specified content. AI determines the filename.",
        )
        .string_param(
            "filepath",
            "Path for the new file (relative to workspace, e.g., 'src/calculator.rs')",
            true,
        )
        .string_param("content", "Complete content to write to the file", true)
        .string_param(
            "reason",
            "Brief explanation of why this file is being created",
            false,
        )
        .requires_confirmation(true)
        .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: CreateParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        match self.workspace.write_file(&params.filepath, &params.content) {
            Ok(()) => ToolResult::success_with_metadata(
                format!(
                    "Created {} ({} bytes)\nReason: {}",
                    params.filepath,
                    params.content.len(),
                    params.reason
                ),
                serde_json::json!({
                    "filepath": params.filepath,
                    "bytes": params.content.len(),
                    "reason": params.reason,
                }),
            ),
            Err(e) => ToolResult::error(format!("Failed to create file: {}", e)),
        }
    }
}
