// Backup job tools module
//
// This module implements the backup job tools for the MCP server.

mod create;
mod delete;
mod details;
mod list;

pub use create::BackupJobCreateTool;
pub use delete::BackupJobDeleteTool;
pub use details::BackupJobDetailsTool;
pub use list::BackupJobListTool;

use log::error;

use crate::client::XoClient;
use crate::tools::query::ListSpec;
use crate::tools::registry::ToolRegistry;

/// REST collection of the backup job resource family
pub const RESOURCE: &str = "backup-jobs";

/// Query defaults and documented filter keys for backup jobs
pub const BACKUP_JOBS: ListSpec = ListSpec {
    resource: RESOURCE,
    default_fields: &["name", "mode", "type", "id"],
    default_filter: &[],
    filter_keys: &["type", "mode"],
};

/// Register backup job tools with the registry
pub fn register_tools(registry: &mut ToolRegistry, client: &XoClient) {
    if let Err(err) = BackupJobListTool::register(registry, client) {
        error!("Failed to register backup job list tool: {}", err);
    }

    if let Err(err) = BackupJobDetailsTool::register(registry, client) {
        error!("Failed to register backup job details tool: {}", err);
    }

    if let Err(err) = BackupJobCreateTool::register(registry, client) {
        error!("Failed to register backup job create tool: {}", err);
    }

    if let Err(err) = BackupJobDeleteTool::register(registry, client) {
        error!("Failed to register backup job delete tool: {}", err);
    }
}
