use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tarxiv_core::TarxivConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "tarxiv")]
#[command(about = "Provision and inspect the TarXiv MySQL schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, table and accounts if they are missing
    Provision {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the provisioning statements with secrets redacted
    Plan {
        #[arg(short, long)]
        config: PathBuf,
        /// Emit the steps as JSON instead of a SQL script
        #[arg(long)]
        json: bool,
    },
    /// Compare the live server against the expected layout
    Verify {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Look up stored notice records
    Get {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        objid: Option<i32>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Load and validate a config file, printing it with secrets redacted
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Commands {
    const fn name(&self) -> &'static str {
        match *self {
            Self::Provision { .. } => "provision",
            Self::Plan { .. } => "plan",
            Self::Verify { .. } => "verify",
            Self::Get { .. } => "get",
            Self::CheckConfig { .. } => "check-config",
        }
    }

    fn config_path(&self) -> &PathBuf {
        match self {
            Self::Provision { config }
            | Self::Plan { config, .. }
            | Self::Verify { config }
            | Self::Get { config, .. }
            | Self::CheckConfig { config } => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.command.config_path();
    let config = TarxivConfig::load(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    logging::init(&config, cli.command.name())?;

    match cli.command {
        Commands::Provision { .. } => commands::provision::run_provision(&config).await,
        Commands::Plan { json, .. } => commands::provision::run_plan(&config, json),
        Commands::Verify { .. } => commands::verify::run(&config).await,
        Commands::Get { objid, name, .. } => commands::get::run(&config, objid, name).await,
        Commands::CheckConfig { .. } => commands::check_config::run(&config),
    }
}
