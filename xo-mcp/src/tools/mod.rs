// Tools module for the MCP server
//
// This module implements the tool registration and execution system
// for the MCP server.

pub mod backup;
pub mod docs;
pub mod envelope;
pub mod list;
pub mod query;
pub mod vm;
pub mod write;
mod registry;

pub use envelope::{strip_href, FailureKind, ToolResponse};
pub use registry::{Tool, ToolDefinition, ToolParameter, ToolRegistry, ToolResult};

use std::sync::Arc;

use log::{error, info, warn};
use serde::Deserialize;
use uuid::Uuid;

use crate::client::XoClient;
use crate::config::ServerConfig;
use crate::errors::ToolError;

/// ToolContext holds contextual information for tool execution
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// Request ID for tracking
    pub request_id: String,
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

/// ToolRequest represents a request to execute a tool
#[derive(Deserialize, Clone, Debug)]
pub struct ToolRequest {
    /// Name of the tool to execute
    pub name: String,
    /// Parameters for the tool execution
    #[serde(default, alias = "arguments")]
    pub parameters: serde_json::Value,
}

/// Initialize the tool registry
pub fn init_registry(config: Arc<ServerConfig>) -> Arc<ToolRegistry> {
    let client = XoClient::new(config);
    let mut registry = ToolRegistry::new();

    // Register VM management tools
    vm::register_tools(&mut registry, &client);

    // Register backup job tools
    backup::register_tools(&mut registry, &client);

    // Register API documentation tool
    docs::register_tools(&mut registry, &client);

    Arc::new(registry)
}

/// Execute a tool with the given request
///
/// Only an unknown tool name is returned as an error; every other outcome,
/// including validation and HTTP failures, comes back as an envelope.
pub async fn execute_tool(
    registry: Arc<ToolRegistry>,
    request: ToolRequest,
    context: ToolContext,
) -> Result<ToolResponse, ToolError> {
    let tool = registry
        .get_tool(&request.name)
        .ok_or_else(|| ToolError::NotFound(request.name.clone()))?;

    info!("[{}] Executing tool '{}'", context.request_id, request.name);

    let response = match tool.execute(request.parameters, context.clone()).await {
        Ok(response) => response,
        Err(err) => {
            log_failure(&request.name, &context, &err);
            ToolResponse::from_error(&err)
        }
    };

    if let ToolResponse::Failure { kind: None, message, .. } = &response {
        info!("[{}] Tool '{}' returned no data: {}", context.request_id, request.name, message);
    }

    Ok(response)
}

fn log_failure(tool_name: &str, context: &ToolContext, err: &ToolError) {
    match err {
        ToolError::Validation(_) => {
            warn!("[{}] Tool '{}' rejected its parameters: {}", context.request_id, tool_name, err)
        }
        ToolError::Http { status, body } => error!(
            "[{}] Tool '{}' HTTP Error: {} - {}",
            context.request_id, tool_name, status, body
        ),
        _ => error!("[{}] Tool '{}' failed: {}", context.request_id, tool_name, err),
    }
}

/// List all available tools
pub fn list_tools(registry: Arc<ToolRegistry>) -> Vec<ToolDefinition> {
    registry.list_tools()
}
