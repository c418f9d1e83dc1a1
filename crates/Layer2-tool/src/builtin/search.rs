//! Search tool - search file contents

use crate::{Tool, ToolDef, ToolResult};
use async_trait::async_trait;
use ember_core::Workspace;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Search tool for text and regex patterns in code files
pub struct SearchCodeTool {
    workspace: Arc<Workspace>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    pattern: String,
    #[serde(default = "default_file_pattern")]
    file_pattern: String,
    #[serde(default)]
    regex: bool,
    #[serde(default)]
    case_sensitive: bool,
}

fn default_file_pattern() -> String {
    "*".to_string()
}

impl SearchCodeTool {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for SearchCodeTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder("search_code", "Search for text patterns in code files")
            .string_param("pattern", "Text or regex pattern to search for", true)
            .string_param(
                "file_pattern",
                "File pattern to search in (default: *)",
                false,
            )
            .boolean_param("regex", "Use regex matching (default: false)", false)
            .boolean_param(
                "case_sensitive",
                "Case-sensitive search (default: false)",
                false,
            )
            .build()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: SearchParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let matches = self.workspace.search_in_files(
            &params.pattern,
            &params.file_pattern,
            params.case_sensitive,
            params.regex,
        );

        let output: Vec<String> = matches
            .iter()
            .map(|m| format!("{}:{}: {}", m.path.display(), m.line, m.text))
            .collect();

        ToolResult::success_with_metadata(
            if output.is_empty() {
                "No matches found".to_string()
            } else {
                output.join("\n")
            },
            serde_json::json!({ "matches": matches.len(), "pattern": params.pattern }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_search_reports_path_line_and_text() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());
        workspace
            .write_file("src/lib.rs", "mod a;\nfn target() {}\n")
            .unwrap();

        let tool = SearchCodeTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({"pattern": "target", "file_pattern": "*.rs"}))
            .await;

        assert!(result.success);
        assert_eq!(result.output, "src/lib.rs:2: fn target() {}");
    }

    #[tokio::test]
    async fn test_no_matches_message() {
        let dir = tempdir().unwrap();
        let workspace = Arc::new(Workspace::new(dir.path(), &[]).unwrap());

        let tool = SearchCodeTool::new(workspace);
        let result = tool.execute(serde_json::json!({"pattern": "absent"})).await;

        assert!(result.success);
        assert_eq!(result.output, "No matches found");
        assert_eq!(result.metadata.unwrap()["matches"], 0);
    }
}
