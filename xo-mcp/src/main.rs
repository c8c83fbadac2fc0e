use std::process;

use anyhow::Result;
use env_logger::{Env, Target};
use log::{error, info, warn};
use xo_mcp::{api, config, tools};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading the environment
    dotenv::dotenv().ok();

    let settings = config::load_config();

    // RUST_LOG wins over LOG_LEVEL; stdout belongs to the protocol
    let default_level = settings.log_level().to_string().to_lowercase();
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .init();

    info!("Starting Xen Orchestra MCP server...");
    info!("Base URL: {}", settings.base_url());
    for warning in settings.warnings() {
        warn!("{}", warning);
    }

    let registry = tools::init_registry(settings);
    info!("Initialized tool registry with {} tools", registry.len());

    match api::run_stdio(registry).await {
        Ok(()) => {
            info!("xo-mcp server stopped");
            Ok(())
        }
        Err(e) => {
            error!("MCP transport failed: {}", e);
            process::exit(1);
        }
    }
}
