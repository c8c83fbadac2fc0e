// Tool registry module
//
// This module defines the tool registry system which manages tool registration
// and discovery for the MCP server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ToolError;
use crate::tools::{ToolContext, ToolResponse};

/// ToolParameter defines a parameter for a tool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Name of the parameter
    pub name: String,
    /// Description of the parameter
    pub description: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Type of the parameter (string, integer, boolean, object, array)
    pub parameter_type: String,
    /// Default value for the parameter
    pub default: Option<Value>,
}

impl ToolParameter {
    pub fn new(name: &str, parameter_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: false,
            parameter_type: parameter_type.to_string(),
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.parameter_type));
        schema.insert("description".to_string(), json!(self.description));
        match self.parameter_type.as_str() {
            "array" => {
                schema.insert("items".to_string(), json!({ "type": "string" }));
            }
            "object" if self.name == "filter" => {
                schema.insert(
                    "additionalProperties".to_string(),
                    json!({ "type": "string" }),
                );
            }
            _ => {}
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        Value::Object(schema)
    }
}

/// ToolDefinition defines a tool available in the MCP server
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,
    /// Description of the tool
    pub description: String,
    /// Parameters for the tool
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    /// JSON Schema of the tool arguments, as announced to the host
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema()))
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Type alias for tool execution results
pub type ToolResult = Result<ToolResponse, ToolError>;

/// Tool trait for implementing tool functionality
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given parameters and context
    async fn execute(&self, params: Value, context: ToolContext) -> ToolResult;

    /// Validate the parameters for the tool
    fn validate_params(&self, params: &Value) -> Result<(), ToolError> {
        let definition = self.definition();

        let map = match params {
            Value::Object(map) => map,
            Value::Null if definition.parameters.iter().all(|p| !p.required) => return Ok(()),
            _ => {
                return Err(ToolError::validation("Parameters must be an object"));
            }
        };

        // Check required parameters
        for param in definition.parameters.iter().filter(|p| p.required) {
            if !param_present(map, &param.name) {
                return Err(ToolError::Validation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

fn param_present(map: &Map<String, Value>, name: &str) -> bool {
    match map.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// ToolRegistry manages tool registration and discovery
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with the registry
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.definition().name;

        if self.tools.contains_key(&name) {
            return Err(ToolError::Validation(format!(
                "Tool with name '{}' already registered",
                name
            )));
        }

        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all registered tools, sorted by name
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
