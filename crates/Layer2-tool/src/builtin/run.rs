//! Run tool - execute terminal commands

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::CommandExecutor;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Run tool for external commands. Safe mode is fixed at registry
/// construction time.
pub struct RunCommandTool {
    executor: Arc<CommandExecutor>,
    safe_mode: bool,
}

#[derive(Debug, Deserialize)]
struct RunParams {
    command: String,
    #[serde(default)]
    reason: String,
}

impl RunCommandTool {
    pub fn new(executor: Arc<CommandExecutor>, safe_mode: bool) -> Self {
        Self {
            executor,
            safe_mode,
        }
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "run_command",
            "Execute a terminal/shell command. Use for running tests, installing packages, etc.",
        )
        .string_param(
            "command",
            "Full command to execute (e.g., 'cargo test' or 'python script.py')",
            true,
        )
        .string_param(
            "reason",
            "Brief explanation of why this command needs to run",
            false,
        )
        .requires_confirmation(true)
        .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: RunParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let outcome = self.executor.run(&params.command, self.safe_mode).await;

        ToolResult {
            success: outcome.success,
            output: outcome.output,
            error: outcome.error,
            metadata: Some(serde_json::json!({
                "returncode": outcome.exit_code,
                "command": params.command,
                "reason": params.reason,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_echo() {
        let dir = tempdir().unwrap();
        let tool = RunCommandTool::new(Arc::new(CommandExecutor::new(dir.path())), false);

        let result = tool
            .execute(serde_json::json!({"command": "echo test-output"}))
            .await;

        assert!(result.success);
        assert_eq!(result.output.trim(), "test-output");
        assert_eq!(result.metadata.unwrap()["returncode"], 0);
    }

    #[tokio::test]
    async fn test_safe_mode_is_enforced() {
        let dir = tempdir().unwrap();
        let tool = RunCommandTool::new(Arc::new(CommandExecutor::new(dir.path())), true);

        let result = tool
            .execute(serde_json::json!({"command": "rm -rf /"}))
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("not allowed in safe mode"));
    }
}
