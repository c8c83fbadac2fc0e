// Backup Job Details Tool
//
// This tool fetches the full record of one backup job.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::RESOURCE;
use crate::client::{Auth, XoClient};
use crate::errors::ToolError;
use crate::tools::query::{normalize_id, parse_params};
use crate::tools::registry::ToolRegistry;
use crate::tools::{
    strip_href, Tool, ToolContext, ToolDefinition, ToolParameter, ToolResponse, ToolResult,
};

#[derive(Debug, Default, Deserialize)]
struct DetailsParams {
    #[serde(default)]
    id: Option<String>,
}

/// Backup Job Details Tool Implementation
pub struct BackupJobDetailsTool {
    client: XoClient,
}

impl BackupJobDetailsTool {
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

/// Wrap a single record as `{details}`; anything but a non-empty object is no data
fn details_envelope(body: Option<Value>, id: &str) -> ToolResponse {
    match body {
        Some(mut record @ Value::Object(_)) => {
            strip_href(&mut record);
            if record.as_object().map_or(true, |r| r.is_empty()) {
                ToolResponse::no_data(format!("Backup job {} returned no data", id))
            } else {
                ToolResponse::success([("details", record)])
            }
        }
        _ => ToolResponse::no_data(format!("Backup job {} returned no data", id)),
    }
}

#[async_trait]
impl Tool for BackupJobDetailsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_backup_job_details".to_string(),
            description: "Get the full details of a backup job. Returns {status, details}."
                .to_string(),
            parameters: vec![
                ToolParameter::new("id", "string", "ID of the backup job").required(),
            ],
        }
    }

    async fn execute(&self, params: Value, _context: ToolContext) -> ToolResult {
        self.validate_params(&params)?;
        let params: DetailsParams = parse_params(&params)?;
        let id = normalize_id(RESOURCE, params.id.as_deref().unwrap_or_default())?;

        let reply = self
            .client
            .get(&format!("{}/{}", RESOURCE, id), Auth::Required)
            .await?;
        Ok(details_envelope(reply.body, &id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_strip_href() {
        let body = json!({"href": "/rest/v0/backup-jobs/7", "id": "7", "mode": "full"});
        let response = details_envelope(Some(body), "7");
        assert_eq!(response.get("details"), Some(&json!({"id": "7", "mode": "full"})));
    }

    #[test]
    fn test_empty_details_are_no_data() {
        for body in [None, Some(json!({})), Some(json!({"href": "/x"})), Some(json!([]))] {
            let response = details_envelope(body, "7");
            assert!(!response.is_success());
            assert_eq!(response.kind(), None);
        }
    }
}
