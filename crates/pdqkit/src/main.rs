//! pdqkit CLI - PDQ perceptual hashing for images.
//!
//! Prints a 64-digit hex PDQ hash and a 0-100 quality score for an image.
//!
//! # Usage
//!
//! ```bash
//! # Hash a file
//! pdqkit hash photo.jpg
//!
//! # Hash an image piped on stdin, as JSON
//! cat photo.png | pdqkit hash - --format json
//!
//! # View configuration
//! pdqkit config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// pdqkit - PDQ perceptual hashing for images.
#[derive(Parser, Debug)]
#[command(name = "pdqkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the PDQ hash and quality of an image
    Hash(cli::hash::HashArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pdqkit_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pdqkit config path`."
            );
            pdqkit_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("pdqkit v{}", pdqkit_core::VERSION);

    match cli.command {
        Commands::Hash(args) => cli::hash::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args),
    }
}
