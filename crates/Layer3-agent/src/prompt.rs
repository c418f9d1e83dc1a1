//! System prompt construction
//!
//! Small local models need the format contract stated bluntly and shown by
//! example; anything softer and they drift into prose.

use ember_tool::ToolDef;
use std::path::Path;

/// Build the fixed instruction text for a task, listing the registered
/// tools and the workspace root.
pub fn build_system_prompt(workspace_root: &Path, tools: &[ToolDef]) -> String {
    format!(
        r#"You MUST respond with tool calls. Do NOT write explanatory text.

AVAILABLE TOOLS:
{tools}

FORMAT (use EXACTLY this):
```json
{{"tool": "create_file", "parameters": {{"filepath": "hello.py", "content": "print('hello')", "reason": "Create example script"}}}}
```

EXAMPLES:

1. Create a file:
```json
{{"tool": "create_file", "parameters": {{"filepath": "main.py", "content": "print('test')", "reason": "Create program"}}}}
```

2. Run it:
```json
{{"tool": "run_command", "parameters": {{"command": "python main.py", "reason": "Execute the program"}}}}
```

IMPORTANT:
- ONLY output ```json blocks
- NO explanations or text outside JSON
- After tools execute, you get results and continue
- Say "Task completed" when done

Workspace: {workspace}

Respond with a ```json block now."#,
        tools = format_tools(tools),
        workspace = workspace_root.display(),
    )
}

/// One line per tool: `- name(param: description, ...): description`
fn format_tools(tools: &[ToolDef]) -> String {
    tools
        .iter()
        .map(|tool| {
            let params: Vec<String> = tool
                .parameters
                .properties
                .as_object()
                .map(|props| {
                    props
                        .iter()
                        .map(|(name, schema)| {
                            let desc = schema
                                .get("description")
                                .and_then(|d| d.as_str())
                                .unwrap_or_default();
                            format!("{}: {}", name, desc)
                        })
                        .collect()
                })
                .unwrap_or_default();
            format!("- {}({}): {}", tool.name, params.join(", "), tool.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
