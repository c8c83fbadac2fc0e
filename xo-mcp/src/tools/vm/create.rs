// VM Create Tool
//
// This tool creates a VM from a template. Extra creation settings can be
// passed through `payload`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::RESOURCE;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::query::{parse_object, parse_params};
use crate::tools::registry::ToolRegistry;
use crate::tools::write::run_create;
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolParameter, ToolResult};

/// Arguments of `create_vm`; `name` and `template_id` are older spellings
#[derive(Debug, Default, Deserialize)]
struct CreateVmParams {
    #[serde(default, alias = "name")]
    name_label: Option<String>,
    #[serde(default, alias = "template_id")]
    template: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

/// VM Create Tool Implementation
pub struct VMCreateTool {
    client: XoClient,
}

impl VMCreateTool {
    /// Create a new VM create tool
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }

    /// Merge the named arguments into the payload and check the result
    fn build_payload(params: CreateVmParams) -> Result<Map<String, Value>, ToolError> {
        let mut payload = match params.payload {
            None | Some(Value::Null) => Map::new(),
            Some(raw) => parse_object(&raw, "payload")?,
        };

        if let Some(name_label) = params.name_label.filter(|s| !s.trim().is_empty()) {
            payload.insert("name_label".to_string(), json!(name_label));
        }
        if let Some(template) = params.template.filter(|s| !s.trim().is_empty()) {
            payload.insert("template".to_string(), json!(template));
        }

        for required in ["name_label", "template"] {
            let present = match payload.get(required) {
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !present {
                return Err(ToolError::Validation(format!(
                    "Missing required parameter: {}",
                    required
                )));
            }
        }

        Ok(payload)
    }
}

#[async_trait]
impl Tool for VMCreateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_vm".to_string(),
            description: "Create a new VM from a template. Returns {status, vm}.".to_string(),
            parameters: vec![
                ToolParameter::new("name_label", "string", "Name of the new VM").required(),
                ToolParameter::new("template", "string", "ID of the template to create the VM from")
                    .required(),
                ToolParameter::new(
                    "payload",
                    "object",
                    "Additional creation settings, as an object or a JSON string",
                ),
            ],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        // Aliases are resolved by serde, so the generic required-parameter
        // check does not apply here.
        let params: CreateVmParams = parse_params(&params)?;
        let payload = Self::build_payload(params)?;

        run_create(&self.client, RESOURCE, payload, "vm", &["id", "uuid", "name_label"]).await
    }
}
