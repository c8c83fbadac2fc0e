// API documentation tool
//
// Returns the REST API's OpenAPI document so the agent can discover valid
// fields and filters.

use std::sync::Arc;

use async_trait::async_trait;
use log::error;
use serde_json::{json, Value};

use crate::client::{Auth, XoClient};
use crate::errors::ToolError;
use crate::tools::registry::ToolRegistry;
use crate::tools::{strip_href, Tool, ToolContext, ToolDefinition, ToolResponse, ToolResult};

/// Location of the OpenAPI document below `/rest/v0`
pub const SWAGGER_PATH: &str = "docs/swagger.json";

/// Register the documentation tool with the registry
pub fn register_tools(registry: &mut ToolRegistry, client: &XoClient) {
    if let Err(err) = DocsTool::register(registry, client) {
        error!("Failed to register docs tool: {}", err);
    }
}

pub struct DocsTool {
    client: XoClient,
}

impl DocsTool {
    pub fn new(client: XoClient) -> Self {
        Self { client }
    }

    /// Register this tool with the registry
    pub fn register(registry: &mut ToolRegistry, client: &XoClient) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(client.clone())))
    }
}

fn docs_envelope(body: Option<Value>) -> ToolResponse {
    let mut docs = match body {
        Some(docs @ (Value::Array(_) | Value::Object(_))) => docs,
        _ => return ToolResponse::no_data("/docs/swagger.json returned no data"),
    };
    strip_href(&mut docs);

    let total = match &docs {
        Value::Array(entries) => entries.len(),
        Value::Object(entries) => entries.len(),
        _ => 0,
    };
    if total == 0 {
        return ToolResponse::no_data("/docs/swagger.json returned no data");
    }
    ToolResponse::success([("total", json!(total)), ("swagger_docs", docs)])
}

#[async_trait]
impl Tool for DocsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_docs".to_string(),
            description: "Fetch the Xen Orchestra REST API documentation (swagger.json). \
                Use it to find valid fields and filters for the list tools. \
                Returns {status, total, swagger_docs}."
                .to_string(),
            parameters: Vec::new(),
        }
    }

    async fn execute(&self, _params: Value, _context: ToolContext) -> ToolResult {
        let reply = self.client.get(SWAGGER_PATH, Auth::Optional).await?;
        Ok(docs_envelope(reply.body))
    }
}
