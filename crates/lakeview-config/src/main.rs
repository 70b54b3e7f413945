//! Main entry point for the Lakeview deployment configuration resolver

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lakeview_config::config::{ConfigValidation, LoggingConfig};
use lakeview_config::{render, Config};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "lakeview-config",
    about = "Lakeview deployment configuration resolver",
    version,
    author
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve and validate the deployment configuration
    Check,

    /// Resolve the configuration and emit the settings document
    Render {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Structured logging first, so resolution failures are structured records
    LoggingConfig::from_env().install(args.debug);

    info!("Starting lakeview-config v{}", lakeview_config::VERSION);

    match run(args.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Configuration resolution failed");
            Err(e)
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    for warning in config.warnings() {
        warn!("{warning}");
    }

    match command {
        Command::Check => {
            info!(summary = %config.summary(), "Configuration resolved");
        }
        Command::Render { pretty, output } => {
            let doc = render::settings_document(&config);
            let rendered = if pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Settings document written");
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}
