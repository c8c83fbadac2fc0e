// Tool handlers for the MCP server
//
// `tools/list` and `tools/call` on top of the tool registry.

use std::sync::Arc;

use log::info;
use serde_json::{json, Value};

use super::{JsonRpcError, INVALID_PARAMS};
use crate::errors::ToolError;
use crate::tools::{self, ToolContext, ToolRegistry, ToolRequest, ToolResponse};

/// Result of `tools/list`
pub fn list_tools(registry: Arc<ToolRegistry>) -> Value {
    let tools: Vec<Value> = tools::list_tools(registry)
        .into_iter()
        .map(|definition| {
            json!({
                "name": definition.name,
                "description": definition.description,
                "inputSchema": definition.input_schema(),
            })
        })
        .collect();

    json!({ "tools": tools })
}

/// Result of `tools/call`
///
/// Tool failures are part of the result (`isError`); only a malformed call
/// or an unknown tool name is a protocol error.
pub async fn call_tool(
    registry: Arc<ToolRegistry>,
    params: Option<Value>,
) -> Result<Value, JsonRpcError> {
    let params = params
        .ok_or_else(|| JsonRpcError::new(INVALID_PARAMS, "Missing params for tools/call"))?;
    let request: ToolRequest = serde_json::from_value(params).map_err(|e| {
        JsonRpcError::new(INVALID_PARAMS, format!("Invalid tools/call params: {}", e))
    })?;

    let context = ToolContext::new();
    info!("[{}] tools/call {}", context.request_id, request.name);

    match tools::execute_tool(registry, request, context).await {
        Ok(response) => Ok(call_result(&response)),
        Err(ToolError::NotFound(name)) => Err(JsonRpcError::new(
            INVALID_PARAMS,
            format!("Unknown tool: {}", name),
        )),
        Err(err) => Ok(call_result(&ToolResponse::from_error(&err))),
    }
}

/// Wrap an envelope as MCP tool output
pub fn call_result(response: &ToolResponse) -> Value {
    let envelope = response.to_value();
    json!({
        "content": [{ "type": "text", "text": envelope.to_string() }],
        "structuredContent": envelope,
        "isError": !response.is_success(),
    })
}
