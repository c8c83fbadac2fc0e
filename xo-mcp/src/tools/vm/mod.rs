// VM tools module
//
// This module implements the VM management tools for the MCP server.

mod create;
mod delete;
mod list;
mod modify;

pub use create::VMCreateTool;
pub use delete::VMDeleteTool;
pub use list::VMListTool;
pub use modify::VMModifyTool;

use log::error;

use crate::client::XoClient;
use crate::tools::query::ListSpec;
use crate::tools::registry::ToolRegistry;

/// REST collection of the VM resource family
pub const RESOURCE: &str = "vms";

/// Query defaults and documented filter keys for VMs
pub const VMS: ListSpec = ListSpec {
    resource: RESOURCE,
    default_fields: &["name_label", "name_description", "power_state", "uuid"],
    default_filter: &[("power_state", "Running")],
    filter_keys: &["power_state", "container", "tags"],
};

/// Register VM management tools with the registry
pub fn register_tools(registry: &mut ToolRegistry, client: &XoClient) {
    // Register VM list tool
    if let Err(err) = VMListTool::register(registry, client) {
        error!("Failed to register VM list tool: {}", err);
    }

    // Register VM create tool
    if let Err(err) = VMCreateTool::register(registry, client) {
        error!("Failed to register VM create tool: {}", err);
    }

    // Register VM delete tool
    if let Err(err) = VMDeleteTool::register(registry, client) {
        error!("Failed to register VM delete tool: {}", err);
    }

    // Register VM modify tool
    if let Err(err) = VMModifyTool::register(registry, client) {
        error!("Failed to register VM modify tool: {}", err);
    }
}
