//! qcirc Command-Line Interface
//!
//! Format, check, inspect and preview-simulate OpenQASM 2.0 circuits.
//!
//! ```text
//! qcirc fmt -i bell.qasm
//! qcirc inspect -i bell.qasm --json
//! qcirc simulate -i bell.qasm --shots 1024 --seed 7
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{check, fmt, inspect, simulate, version};
use config::Config;

/// qcirc - circuit graph tooling for OpenQASM 2.0
#[derive(Parser)]
#[command(name = "qcirc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a circuit file in canonical form
    Fmt {
        /// Input file
        #[arg(short, long)]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Fail if any line could not be decoded
        #[arg(long)]
        strict: bool,
    },

    /// Report undecodable lines and graph integrity problems
    Check {
        /// Input file
        #[arg(short, long)]
        input: String,
    },

    /// Show the steps and nodes of a circuit
    Inspect {
        /// Input file
        #[arg(short, long)]
        input: String,

        /// Print the node list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview the statevector of a circuit
    Simulate {
        /// Input file
        #[arg(short, long)]
        input: String,

        /// Only apply nodes up to and including this step
        #[arg(long)]
        up_to_step: Option<u32>,

        /// Number of measurement samples to draw
        #[arg(short, long)]
        shots: Option<usize>,

        /// Seed for sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = match (&config.logging.filter, cli.quiet, cli.verbose) {
        (Some(filter), _, _) => filter.clone(),
        (None, true, _) => "error".to_string(),
        (None, false, 0) => "warn".to_string(),
        (None, false, 1) => "info".to_string(),
        (None, false, 2) => "debug".to_string(),
        (None, false, _) => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(%config, "configuration loaded");

    let result = match cli.command {
        Commands::Fmt {
            input,
            output,
            strict,
        } => fmt::execute(&input, output.as_deref(), strict),
        Commands::Check { input } => check::execute(&input),
        Commands::Inspect { input, json } => inspect::execute(&input, json),
        Commands::Simulate {
            input,
            up_to_step,
            shots,
            seed,
            json,
        } => {
            let options = simulate::Options {
                up_to_step,
                shots: shots.unwrap_or(config.simulator.default_shots),
                seed: seed.or(config.simulator.seed),
                json,
            };
            simulate::execute(&input, &options, &config)
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
