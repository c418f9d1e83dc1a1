//! Analyze tool - code statistics

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Analyze tool for line/comment/blank statistics
pub struct AnalyzeCodeTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeParams {
    #[serde(default = "default_file_pattern")]
    file_pattern: String,
}

fn default_file_pattern() -> String {
    "*".to_string()
}

impl AnalyzeCodeTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for AnalyzeCodeTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("analyze_code", "Analyze code structure and statistics")
            .string_param("file_pattern", "File pattern to analyze (default: *)", false)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: AnalyzeParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let stats = self.workspace.count_lines(&params.file_pattern);
        let total = stats.total_lines.max(1);

        let output = format!(
            "Code Analysis Results:\n\n\
             Total Files: {}\n\
             Total Lines: {}\n\
             Code Lines: {}\n\
             Comment Lines: {}\n\
             Blank Lines: {}\n\n\
             Code Ratio: {:.1}%\n\
             Comment Ratio: {:.1}%\n",
            stats.total_files,
            stats.total_lines,
            stats.code_lines,
            stats.comment_lines,
            stats.blank_lines,
            stats.code_lines as f64 / total as f64 * 100.0,
            stats.comment_lines as f64 / total as f64 * 100.0,
        );

        ToolResult::success_with_metadata(
            output,
            serde_json::json!({
                "total_files": stats.total_files,
                "total_lines": stats.total_lines,
                "code_lines": stats.code_lines,
                "comment_lines": stats.comment_lines,
                "blank_lines": stats.blank_lines,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_analyze_reports_stats() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace
            .write_file("m.rs", "// doc\nfn main() {}\n\n")
            .unwrap();

        let tool = AnalyzeCodeTool::new(workspace);
        let result = tool.execute(serde_json::json!({"file_pattern": "*.rs"})).await;

        assert!(result.success);
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata["total_files"], 1);
        assert_eq!(metadata["comment_lines"], 1);
        assert_eq!(metadata["code_lines"], 1);
        assert_eq!(metadata["blank_lines"], 1);
    }
}
