// VM Modify Tool
//
// This tool updates the mutable properties of a VM.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::RESOURCE;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::query::{normalize_id, parse_params};
use crate::tools::registry::ToolRegistry;
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolParameter, ToolResponse, ToolResult};

#[derive(Debug, Default, Deserialize)]
struct ModifyVmParams {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name_label: Option<String>,
    #[serde(default)]
    name_description: Option<String>,
}

impl ModifyVmParams {
    /// PATCH body holding only the fields the caller supplied
    ///
    /// An empty `name_description` is a valid update; an empty `name_label`
    /// is not.
    fn changes(&self) -> Result<Map<String, Value>, ToolError> {
        let mut changes = Map::new();
        if let Some(name_label) = &self.name_label {
            if name_label.trim().is_empty() {
                return Err(ToolError::validation("'name_label' must not be empty"));
            }
            changes.insert("name_label".to_string(), json!(name_label));
        }
        if let Some(name_description) = &self.name_description {
            changes.insert("name_description".to_string(), json!(name_description));
        }
        if changes.is_empty() {
            return Err(ToolError::validation(
                "At least one of name_label or name_description must be provided",
            ));
        }
        Ok(changes)
    }
}

/// VM Modify Tool Implementation
pub struct VMModifyTool {
    client: XoClient,
}

impl VMModifyTool {
    /// Create a new VM modify tool
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for VMModifyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "modify_vm".to_string(),
            description: "Update a VM's name_label and/or name_description. \
                Returns {status, id, updated_fields}."
                .to_string(),
            parameters: vec![
                ToolParameter::new("id", "string", "ID of the VM to modify").required(),
                ToolParameter::new("name_label", "string", "New name of the VM"),
                ToolParameter::new("name_description", "string", "New description of the VM"),
            ],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        self.validate_params(&params)?;
        let params: ModifyVmParams = parse_params(&params)?;

        let id = normalize_id(RESOURCE, params.id.as_deref().unwrap_or_default())?;
        let changes = params.changes()?;
        let updated_fields: Vec<String> = changes.keys().cloned().collect();

        self.client
            .patch(&format!("{}/{}", RESOURCE, id), &Value::Object(changes))
            .await?;

        Ok(ToolResponse::success([
            ("id", json!(id)),
            ("updated_fields", json!(updated_fields)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> ModifyVmParams {
        parse_params(&value).unwrap()
    }

    #[test]
    fn test_changes_keep_supplied_fields_only() {
        let changes = params(json!({"id": "a", "name_description": ""})).changes().unwrap();
        assert_eq!(Value::Object(changes), json!({"name_description": ""}));
    }

    #[test]
    fn test_no_mutable_field_rejected() {
        assert!(matches!(
            params(json!({"id": "a"})).changes(),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_name_label_rejected() {
        assert!(params(json!({"id": "a", "name_label": "  "})).changes().is_err());
    }
}
