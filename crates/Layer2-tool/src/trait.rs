//! Tool trait and related types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool: name, description, parameter schema, and whether
/// executing it requires user confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (unique identifier, case-sensitive)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for parameters
    pub parameters: ToolParameters,

    /// Whether this tool must pass the confirmation gate before executing
    #[serde(default)]
    pub requires_confirmation: bool,
}

/// Parameters schema for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Type (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Properties (parameter definitions)
    pub properties: Value,

    /// Required parameters
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolDef {
    /// Create a new tool definition builder
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolDefBuilder {
        ToolDefBuilder::new(name, description)
    }

    /// Render as a `{name, description, parameters}` schema for
    /// function-calling style APIs
    pub fn to_schema(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": self.parameters.schema_type,
                "properties": self.parameters.properties,
                "required": self.parameters.required,
            }
        })
    }

    /// Render wrapped in the `{"type":"function","function":{...}}` envelope
    pub fn to_function_schema(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": self.to_schema(),
        })
    }
}

/// Builder for ToolDef
pub struct ToolDefBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
    requires_confirmation: bool,
}

impl ToolDefBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: vec![],
            requires_confirmation: false,
        }
    }

    /// Add a string parameter
    pub fn string_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "string",
                "description": description.into()
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Add an integer parameter
    pub fn integer_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "integer",
                "description": description.into()
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Add a boolean parameter
    pub fn boolean_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "boolean",
                "description": description.into()
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Mark the tool as requiring user confirmation
    pub fn requires_confirmation(mut self, required: bool) -> Self {
        self.requires_confirmation = required;
        self
    }

    /// Build the ToolDef
    pub fn build(self) -> ToolDef {
        ToolDef {
            name: self.name,
            description: self.description,
            parameters: ToolParameters {
                schema_type: "object".to_string(),
                properties: Value::Object(self.properties),
                required: self.required,
            },
            requires_confirmation: self.requires_confirmation,
        }
    }
}

/// Result of tool execution. Exactly one is produced per executed call;
/// failures are carried here, never raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether execution was successful
    pub success: bool,

    /// Result text
    pub output: String,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolResult {
    /// Create a success result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            metadata: None,
        }
    }

    /// Create a success result with metadata
    pub fn success_with_metadata(output: impl Into<String>, metadata: Value) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            metadata: Some(metadata),
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message.into()),
            metadata: None,
        }
    }

    /// Create a cancelled-by-user result. Cancellation is not an error; the
    /// output text is what gets fed back to the model.
    pub fn cancelled() -> Self {
        Self {
            success: false,
            output: "Cancelled by user".to_string(),
            error: None,
            metadata: None,
        }
    }
}

/// Tool trait - implement this to create a new tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> ToolDef;

    /// Execute the tool with given parameters
    async fn execute(&self, params: Value) -> ToolResult;

    /// Get the tool name (convenience method)
    fn name(&self) -> String {
        self.definition().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_required_params() {
        let def = ToolDef::builder("sample", "A sample tool")
            .string_param("path", "A path", true)
            .integer_param("depth", "A depth", false)
            .requires_confirmation(true)
            .build();

        assert_eq!(def.name, "sample");
        assert!(def.requires_confirmation);
        assert_eq!(def.parameters.required, vec!["path".to_string()]);
        assert!(def.parameters.properties.get("depth").is_some());
    }

    #[test]
    fn test_schema_export() {
        let def = ToolDef::builder("read_file", "Read a file")
            .string_param("filepath", "Path to read", true)
            .build();

        let schema = def.to_schema();
        assert_eq!(schema["name"], "read_file");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(
            schema["parameters"]["properties"]["filepath"]["type"],
            "string"
        );
        assert_eq!(schema["parameters"]["required"][0], "filepath");

        let wrapped = def.to_function_schema();
        assert_eq!(wrapped["type"], "function");
        assert_eq!(wrapped["function"]["name"], "read_file");
    }
}
