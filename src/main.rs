use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version, about = "Product catalog web front-end")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to vitrine.toml. Defaults to ./vitrine.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the catalog pages
    Serve {
        /// Port to serve on (overrides config and VITRINE_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Base URL of the products API (overrides config and VITRINE_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Open the catalog in a browser once the server is up
        #[arg(long)]
        open: bool,

        /// Enable dev mode (bind 0.0.0.0, permissive CORS)
        #[arg(long)]
        dev: bool,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Check the effective configuration for unusable values
    Validate,
    /// Write a default vitrine.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve {
            port,
            api_url,
            open,
            dev,
        } => {
            cmd::cmd_serve(&cli, *port, api_url.clone(), *open, *dev).await?;
        }
        Commands::Config { command } => cmd::cmd_config(&cli, command.clone())?,
    }

    Ok(())
}
