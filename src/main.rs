//! Orchestra - multi-agent workflow orchestration service
//!
//! Main entry point for the Orchestra CLI and server.

mod adapters;
mod cli;
mod server;

use clap::Parser;
use tracing::info;

use orchestra_config::ConfigLoader;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_with_env(&cli.config)?;
    server::init_tracing(&config.logging)?;
    if cli.config.exists() {
        info!("Loaded config from {}", cli.config.display());
    } else {
        info!("No config at {}, using defaults", cli.config.display());
    }

    match cli.command {
        None => {
            server::check_config(&config)?;
            server::run_server(config).await
        }
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::check_config(&config)?;
            server::run_server(config).await
        }
        Some(Commands::Execute { file }) => {
            server::check_config(&config)?;
            let record = server::execute_file(&config, &file).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}
