//! CLI frontend for Wirkzeit effect scenarios.

mod commands;
mod scenario;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::simulate::SimulateOptions;

#[derive(Parser)]
#[command(
    name = "wz",
    about = "Wirkzeit: timed effect tracking for tabletop encounters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and summarize its contents
    Check {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Show total and remaining duration of every effect
    Evaluate {
        /// Scenario JSON file
        file: PathBuf,

        /// Evaluate at this world time instead of the scenario's
        #[arg(long)]
        at: Option<f64>,
    },

    /// Play combat rounds and report effects as they expire
    Simulate {
        /// Scenario JSON file
        file: PathBuf,

        /// Number of rounds to play
        #[arg(short, long, default_value = "3")]
        rounds: u32,

        /// RNG seed for initiative rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Remove effects from their actors once they expire
        #[arg(long)]
        remove_expired: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file),
        Commands::Evaluate { file, at } => commands::evaluate::run(&file, at),
        Commands::Simulate {
            file,
            rounds,
            seed,
            remove_expired,
        } => commands::simulate::run(
            &file,
            &SimulateOptions {
                rounds,
                seed,
                remove_expired,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
