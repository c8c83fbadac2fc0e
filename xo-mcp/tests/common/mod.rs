#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use xo_mcp::config::ServerConfig;
use xo_mcp::tools::{
    execute_tool, init_registry, ToolContext, ToolRegistry, ToolRequest, ToolResponse,
};

pub const TOKEN: &str = "test-token";

pub fn cookie() -> String {
    format!("authenticationToken={}", TOKEN)
}

pub fn config_for(base_url: &str) -> ServerConfig {
    ServerConfig::default()
        .with_base_url(base_url)
        .with_credential(TOKEN)
        .with_request_timeout(Duration::from_secs(5))
}

pub fn registry_for(base_url: &str) -> Arc<ToolRegistry> {
    init_registry(Arc::new(config_for(base_url)))
}

pub async fn call(registry: &Arc<ToolRegistry>, name: &str, parameters: Value) -> ToolResponse {
    let request = ToolRequest {
        name: name.to_string(),
        parameters,
    };
    execute_tool(registry.clone(), request, ToolContext::new())
        .await
        .expect("tool is registered")
}
