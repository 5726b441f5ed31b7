//! aictx - project context memory for AI coding assistants.
//!
//! Appends timestamped entries to `.ai-context/memory.md` in the current
//! project and keeps `CLAUDE.md`, `.cursorrules`,
//! `.github/copilot-instructions.md` and `.windsurfrules` pointing at it.
//!
//! # Configuration
//!
//! - `AICTX_CONFIG_DIR` - Optional, defaults to the platform config dir + `aictx`
//! - `AICTX_DATA_DIR` - Optional, audit log location
//! - `AICTX_AUDIT` - Set to `0` to disable the audit log
//! - `RUST_LOG` - Log filter, e.g. `aictx_core=debug`

use std::process::ExitCode;

use aictx_core::{AictxError, AppConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod prompt;

use cli::Cli;
use commands::App;

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; everything else is a usage error.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing to stderr (stdout carries command output).
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    tracing::debug!("Config dir: {}", config.config_dir.display());

    App::new(config, cwd).run(cli.command)
}

fn report(err: &anyhow::Error) {
    eprintln!("error: {:#}", err);
    if let Some(hint) = err.downcast_ref::<AictxError>().and_then(AictxError::suggestion) {
        eprintln!("hint: {}", hint);
    }
}
