//! debuglog CLI - per-process rotating debug log files

use anyhow::Result;
use clap::Parser;
use debuglog_core::LogFileSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Diagnostics go to stderr; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "debuglog={0},debuglog_core={0},debuglog_files={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Record(args) => {
            let settings = resolve_settings(cli.config.as_deref(), cli.dir, args.overrides())?;
            record::execute(args, settings).await
        }
        Commands::List => {
            let settings = resolve_settings(cli.config.as_deref(), cli.dir, LogFileSettings::default())?;
            list::execute(settings)
        }
        Commands::Clean(args) => {
            let settings = resolve_settings(cli.config.as_deref(), cli.dir, LogFileSettings::default())?;
            clean::execute(args, settings).await
        }
    }
}
