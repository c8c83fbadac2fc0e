// VM Delete Tool
//
// This tool deletes a VM by id.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::RESOURCE;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::query::parse_params;
use crate::tools::registry::ToolRegistry;
use crate::tools::write::run_delete;
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolParameter, ToolResult};

#[derive(Debug, Default, Deserialize)]
struct DeleteVmParams {
    #[serde(default, alias = "vm_id")]
    id: Option<String>,
}

/// VM Delete Tool Implementation
pub struct VMDeleteTool {
    client: XoClient,
}

impl VMDeleteTool {
    /// Create a new VM delete tool
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for VMDeleteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "delete_vm".to_string(),
            description: "Delete a VM. The id may be bare (`<uuid>`) or path-like \
                (`/rest/v0/vms/<uuid>`). Returns {status, id}."
                .to_string(),
            parameters: vec![
                ToolParameter::new("id", "string", "ID of the VM to delete").required(),
            ],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        let params: DeleteVmParams = parse_params(&params)?;
        run_delete(&self.client, RESOURCE, params.id.as_deref()).await
    }
}
