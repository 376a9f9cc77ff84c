mod animate;
mod api;
mod charts;
mod config;
mod dashboard;
mod export;
mod models;
mod stats;
mod topo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dashboard::DashboardController;

#[derive(Parser)]
#[command(author, version, about = "US county education analytics dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the datasets and build the full dashboard (five charts + HTML page)
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Seed for the synthetic trend series, for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Fetch the datasets and show the summary statistics only
    Stats {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Fetch the datasets and export the county records to CSV
    Export {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config, seed } => {
            let app_config = config::load_config(config)?;
            DashboardController::new(app_config).run(*seed).await?;
        }
        Commands::Stats { config } => {
            let app_config = config::load_config(config)?;
            DashboardController::new(app_config).run_stats().await?;
        }
        Commands::Export { config } => {
            let app_config = config::load_config(config)?;
            DashboardController::new(app_config).run_export().await?;
        }
    }

    Ok(())
}
