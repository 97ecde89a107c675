use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use predator::config::CycleConfig;

mod cmd;

use cmd::run::CycleArg;

#[derive(Parser)]
#[command(name = "predator")]
#[command(version, about = "Phase-sequencing engine behind the Predator Analytics live-cycle views")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file. Built-in defaults are used when absent.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a cycle locally with a terminal view
    Run {
        /// Which cycle to run
        #[arg(value_enum, default_value = "improvement")]
        cycle: CycleArg,
        /// Auto-approve the review gate
        #[arg(long)]
        yes: bool,
    },
    /// Expose an evolution cycle behind the REST status endpoints
    Serve {
        #[arg(long, default_value_t = 7331)]
        port: u16,
    },
    /// Mirror a remote cycle through the polling adapter
    Watch {
        /// Base URL of the status server
        #[arg(long, default_value = "http://127.0.0.1:7331")]
        url: String,
        /// Send the start signal before polling
        #[arg(long)]
        start: bool,
        /// Keep polling after the remote goes idle
        #[arg(long)]
        continuous: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CycleConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { cycle, yes } => cmd::run::execute(cycle, config, yes).await,
        Commands::Serve { port } => cmd::serve::execute(port, config).await,
        Commands::Watch {
            url,
            start,
            continuous,
        } => cmd::watch::execute(&url, start, continuous, config).await,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "predator=debug" } else { "predator=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
