use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use token_manager::config::loader;
use token_manager::observability::metrics::render_metrics;
use token_manager::utils::logging::{self, LogLevel};
use token_manager::TokenManager;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-manager.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Print Prometheus metrics after the command
    #[arg(long)]
    metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the access token
    Token,
    /// Print the Authorization header
    Header,
    /// Acquire a token and print its metadata as JSON
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = loader::file_to_config(Path::new(&args.config))?;
    logging::run(&service_config.logging, args.log_level);

    let credentials = service_config
        .credentials
        .as_ref()
        .ok_or_else(|| anyhow!("config '{}' has no credentials section", args.config))?;

    // -------------------------------
    // 2. Build and configure the manager
    // -------------------------------

    let manager = TokenManager::from_config(&service_config.token)?;
    manager
        .configure(
            credentials.client_id.as_str(),
            credentials.client_secret.as_str(),
            credentials.workspace_id.as_str(),
        )
        .await?;
    info!("token manager ready");

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Token => println!("{}", manager.get_token().await?),
        Command::Header => {
            for (name, value) in manager.get_auth_header().await? {
                println!("{}: {}", name, value);
            }
        }
        Command::Info => {
            manager.get_token().await?;
            println!("{}", serde_json::to_string_pretty(&manager.get_token_info())?);
        }
    }

    if args.metrics {
        print!("{}", render_metrics().await?);
    }

    Ok(())
}
