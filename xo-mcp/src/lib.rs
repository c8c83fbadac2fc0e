// xo-mcp: Model Context Protocol Server for Xen Orchestra
//
// This library implements a Model Context Protocol (MCP) server which exposes
// the Xen Orchestra REST API as tools for AI agents.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod tools;

/// Version of the MCP specification implemented by this server
pub const MCP_VERSION: &str = "2024-11-05";

/// Name the server announces to the host
pub const SERVER_NAME: &str = "xo_mcp_server";

/// Default server configuration constants
pub mod defaults {
    /// Default Xen Orchestra base URL
    pub const BASE_URL: &str = "http://localhost:80";
    /// Default timeout for requests in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
    /// Default number of records returned by list tools
    pub const LIST_LIMIT: u32 = 42;
    /// Maximum number of bytes of an error body kept in an envelope
    pub const ERROR_BODY_MAX_BYTES: usize = 2048;
}
