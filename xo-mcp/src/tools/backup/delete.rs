// Backup Job Delete Tool
//
// This tool deletes a backup job by id.

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
struct DeleteParams {
    #[serde(default)]
    id: Option<String>,
}

/// Backup Job Delete Tool Implementation
pub struct BackupJobDeleteTool {
    client: XoClient,
}

impl BackupJobDeleteTool {
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for BackupJobDeleteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "delete_backup_job".to_string(),
            description: "Delete a backup job. Returns {status, id}.".to_string(),
            parameters: vec![
                ToolParameter::new("id", "string", "ID of the backup job to delete").required(),
            ],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        self.validate_params(&params)?;
        let params: DeleteParams = parse_params(&params)?;
        run_delete(&self.client, RESOURCE, params.id.as_deref()).await
    }
}
