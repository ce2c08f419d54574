mod commands;
mod config;
mod http;
mod platform;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::sync::{SyncOptions, cmd_sync};
use config::PlatformConfig;

/// Builds private RSS feeds for the podcasts of a subscriber account
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Account user name
    user: String,
    /// Account password
    password: String,
    /// Directory for the <slug>.xml feeds [default: $POSTFEED_DIR or .]
    #[arg(short = 'f', long = "folder")]
    folder: Option<PathBuf>,
    /// Only sync these podcasts, by slug; every podcast in the catalog otherwise
    #[arg(long, num_args = 1..)]
    podcast: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("postfeed=info,feedsync=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

fn run(args: Args) -> anyhow::Result<bool> {
    let config = PlatformConfig::from_env()?;
    let opts = SyncOptions {
        user: args.user,
        password: args.password,
        dir: config::output_dir(args.folder),
        podcasts: args.podcast,
    };
    let summary = cmd_sync(&config, opts)?;
    if !summary.failed.is_empty() {
        error!(
            failed = summary.failed.len(),
            saved = summary.synced.len(),
            "some podcasts were not synced"
        );
    }
    Ok(summary.failed.is_empty())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
