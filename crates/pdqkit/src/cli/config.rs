//! The `pdqkit config` command: inspect and create the config file.

use anyhow::Context;
use clap::{Args, Subcommand};
use pdqkit_core::Config;
use std::fmt::Write as _;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the config file and print it with the effective decoder limits
    Show,

    /// Show config file path
    Path,

    /// Write a config file with default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,

        /// Set `hashing.force_rgb = true` in the new file
        #[arg(long)]
        force_rgb: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            // No fallback to defaults here
            let config = Config::load().with_context(|| {
                format!("Invalid config at {}", Config::default_path().display())
            })?;
            print!("{}", render(&config)?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force, force_rgb } => {
            let path = Config::default_path();
            init_at(&path, force, force_rgb)?;
            tracing::info!(path = %path.display(), force_rgb, "Config file created");
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Render a config as TOML followed by the limits the decoder will enforce.
fn render(config: &Config) -> anyhow::Result<String> {
    let mut out = config.to_toml()?;
    let limits = config.limits.to_image_limits();
    let dimension = |limit: Option<u32>| limit.map_or("none".to_string(), |v| v.to_string());

    out.push_str("\n# Effective decoder limits\n");
    writeln!(out, "# max width:  {}", dimension(limits.max_image_width))?;
    writeln!(out, "# max height: {}", dimension(limits.max_image_height))?;
    writeln!(
        out,
        "# max alloc:  {}",
        limits
            .max_alloc
            .map_or("none".to_string(), |bytes| format!("{bytes} bytes"))
    )?;
    Ok(out)
}

/// Write a default config to `path`, with `force_rgb` applied to `[hashing]`.
///
/// The written file is read back through the normal loader so a file that
/// `init` produces is always one that `hash` accepts.
fn init_at(path: &Path, force: bool, force_rgb: bool) -> anyhow::Result<Config> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut config = Config::default();
    config.hashing.force_rgb = force_rgb;
    std::fs::write(path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(Config::load_from(path)?)
}
