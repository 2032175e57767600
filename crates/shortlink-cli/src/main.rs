//! shortlink - Command-line client for the shortlink URL shortener.
//!
//! A thin wrapper over the `shortlink` library. The access token is kept in
//! the user's data directory between invocations.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, links};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &cli.backend).await,
        Commands::Links(cmd) => links::handle(cmd, &cli.backend).await,
    };

    if let Err(e) = &result
        && e.chain()
            .filter_map(|cause| cause.downcast_ref::<shortlink::Error>())
            .any(shortlink::Error::is_auth_terminal)
    {
        output::error("Your session has ended. Run 'shortlink auth login' to sign in again.");
    }

    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays machine-readable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
