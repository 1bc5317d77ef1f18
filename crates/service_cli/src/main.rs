//! FinRisk CLI - Command Line Front-End for Risk Simulations
//!
//! Drives the simulation dashboard and the premium form headlessly.
//!
//! # Commands
//!
//! - `finrisk simulate --type market-risk` - Run a simulation and print the results
//! - `finrisk report <id>` - Print the report of a simulation
//! - `finrisk download <id>` - Save the report file of a simulation
//! - `finrisk premium --branch vie` - Print the premium request of a branch
//! - `finrisk check` - Check configuration and backend availability

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use infra_config::{build_config, CliOverrides};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// FinRisk risk simulation CLI
#[derive(Parser)]
#[command(name = "finrisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, default_value = "finrisk.toml")]
    config: PathBuf,

    /// Base URL of the simulation API
    #[arg(long, global = true, env = "FINRISK_BASE_URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory downloaded reports are saved into
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print its results
    Simulate {
        /// Simulation type (market-risk, credit-risk, stress-test, liquidity-risk)
        #[arg(short = 't', long = "type", default_value = "market-risk")]
        simulation_type: String,

        /// Portfolio id (defaults to the first portfolio)
        #[arg(short, long)]
        portfolio: Option<String>,

        /// Scenario ids; default scenarios are used when omitted
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,

        /// VaR confidence level
        #[arg(long)]
        confidence_level: Option<String>,

        /// VaR time horizon in days
        #[arg(long)]
        time_horizon: Option<String>,

        /// VaR method (historical, parametric, monte-carlo)
        #[arg(long)]
        method: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the report of a simulation
    Report {
        /// Simulation id
        id: String,
    },

    /// Save the report file of a simulation
    Download {
        /// Simulation id
        id: String,
    },

    /// Print the premium calculation request for an insurance branch
    Premium {
        /// Insurance branch (vie, non_vie, obligatoire)
        #[arg(short, long, default_value = "vie")]
        branch: String,

        /// Field assignments as name=value
        #[arg(short, long = "set")]
        fields: Vec<String>,
    },

    /// Check configuration and backend availability
    Check,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        config_file: Some(cli.config.clone()),
        base_url: cli.base_url.clone(),
        log_level: if cli.verbose {
            Some("debug".to_string())
        } else {
            cli.log_level.clone()
        },
        download_dir: cli.download_dir.clone(),
    };
    let config = build_config(&overrides).context("Failed to load configuration")?;

    init_tracing(config.log_level.directive());
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Simulate {
            simulation_type,
            portfolio,
            scenarios,
            confidence_level,
            time_horizon,
            method,
            format,
        } => {
            let options = commands::simulate::SimulateOptions {
                simulation_type,
                portfolio,
                scenarios,
                confidence_level,
                time_horizon,
                method,
                format,
            };
            commands::simulate::run(&config, &options).await?
        }
        Commands::Report { id } => commands::report::run(&config, &id).await?,
        Commands::Download { id } => commands::download::run(&config, &id).await?,
        Commands::Premium { branch, fields } => commands::premium::run(&branch, &fields)?,
        Commands::Check => commands::check::run(&config).await?,
    }

    Ok(())
}
