//! Pet Nutrition Predictor CLI
//!
//! A command-line tool for running nutritional assessments, inspecting
//! the configured engine, and debugging the feature encoding.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nutrition_engine::EngineContext;
use std::path::PathBuf;

use crate::output::print_error;

/// Pet Nutrition Predictor CLI
#[derive(Parser)]
#[command(name = "pnp")]
#[command(author, version, about = "CLI for the Pet Nutrition Predictor", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging (RUST_LOG overrides)
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a nutritional assessment for one pet profile
    Predict {
        /// Path to the profile JSON, or `-` for stdin
        #[arg(long, short)]
        input: PathBuf,

        /// Caller-side pet reference; when given the output is wrapped
        /// in a prediction record suitable for persistence
        #[arg(long)]
        pet_ref: Option<String>,
    },

    /// Show the configured backend, model version, and encoder version
    EngineInfo,

    /// Show the feature vector a profile encodes to
    Encode {
        /// Path to the profile JSON, or `-` for stdin
        #[arg(long, short)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli).await;
    if let Err(e) = &result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Predict { input, pet_ref } => {
            let profile = commands::load_profile(&input)?;
            let context = EngineContext::from_env()?;
            commands::predict::run(&context, &profile, pet_ref, cli.format).await?;
        }
        Commands::EngineInfo => {
            let context = EngineContext::from_env()?;
            commands::info::run(&context, cli.format)?;
        }
        Commands::Encode { input } => {
            let profile = commands::load_profile(&input)?;
            commands::encode::run(&profile, cli.format)?;
        }
    }
    Ok(())
}
