// Backup Job Create Tool
//
// This tool creates a backup job from a caller-supplied definition.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::RESOURCE;
use crate::client::XoClient;
use crate::errors::ToolError;
use crate::tools::registry::ToolRegistry;
use crate::tools::write::{require_payload, run_create};
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolParameter, ToolResult};

/// Backup Job Create Tool Implementation
pub struct BackupJobCreateTool {
    client: XoClient,
}

impl BackupJobCreateTool {
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

#[async_trait]
impl Tool for BackupJobCreateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_backup_job".to_string(),
            description: "Create a backup job. The payload is the job definition \
                (name, mode, schedules, settings...). Returns {status, backup_job}."
                .to_string(),
            parameters: vec![ToolParameter::new(
                "payload",
                "object",
                "Backup job definition, as an object or a JSON string",
            )
            .required()],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        if !params.is_object() && !params.is_null() {
            return Err(ToolError::validation("Parameters must be an object"));
        }
        let payload = require_payload(params.get("payload"))?;

        run_create(
            &self.client,
            RESOURCE,
            payload,
            "backup_job",
            &["id", "name", "mode", "type"],
        )
        .await
    }
}
