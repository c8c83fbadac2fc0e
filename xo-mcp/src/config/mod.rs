// Configuration module for the MCP server
//
// This module handles loading the connection settings for the
// Xen Orchestra REST API.

mod settings;

pub use settings::{
    parse_log_level, ServerConfig, TlsVerify, ENV_API_TOKEN, ENV_BASE_URL, ENV_CERT_PATH,
    ENV_CERT_VERIFY, ENV_LOG_LEVEL, ENV_REQUEST_TIMEOUT,
};

use std::sync::Arc;

/// Load configuration from the process environment
///
/// Never fails: a missing token is recorded in `ServerConfig::warnings` and
/// reported by each authenticated tool when it is called.
pub fn load_config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig::from_env())
}
