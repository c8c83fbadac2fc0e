// Backup Job List Tool
//
// This tool lists the backup jobs configured in Xen Orchestra.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::BACKUP_JOBS;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::list::{list_parameters, run_list};
use crate::tools::registry::ToolRegistry;
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolResult};

/// Backup Job List Tool Implementation
pub struct BackupJobListTool {
    client: XoClient,
}

impl BackupJobListTool {
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for BackupJobListTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_backup_jobs".to_string(),
            description: "List backup jobs in Xen Orchestra, with dynamic fields and filter. \
                Returns {status, total, backup_jobs}."
                .to_string(),
            parameters: list_parameters(
                &BACKUP_JOBS,
                "Example: [\"name\", \"mode\", \"type\", \"id\", \"schedules\"].",
                "Example: {\"type\": \"backup\", \"mode\": \"full\"}.",
            ),
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        run_list(&self.client, &BACKUP_JOBS, &params, "backup_jobs").await
    }
}
