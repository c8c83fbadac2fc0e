// VM List Tool
//
// This tool lists the VMs known to Xen Orchestra, with caller-chosen fields
// and filters.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::VMS;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::list::{list_parameters, run_list};
use crate::tools::registry::ToolRegistry;
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolResult};

/// VM List Tool Implementation
pub struct VMListTool {
    client: XoClient,
}

impl VMListTool {
    /// Create a new VM list tool
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for VMListTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_vms".to_string(),
            description: "List VMs in Xen Orchestra, with dynamic fields and filter. \
                Returns {status, total, vms}. Use get_docs to discover valid fields."
                .to_string(),
            parameters: list_parameters(
                &VMS,
                r#"Example: ["name_label", "name_description", "power_state", "uuid", "tags"]."#,
                r#"Example: {"power_state": "Running", "container": "Ares", "tags": "Critical"}."#,
            ),
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        run_list(&self.client, &VMS, &params, "vms").await
    }
}
