//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::links::LinksCommand;

/// Command-line client for the shortlink URL shortener.
#[derive(Parser, Debug)]
#[command(name = "shortlink")]
#[command(author, version = env!("SHORTLINK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend base URL
    #[arg(
        long,
        global = true,
        env = "SHORTLINK_BACKEND_URL",
        default_value = "http://localhost:3001"
    )]
    pub backend: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Auth(AuthCommand),

    /// Create and inspect short links
    Links(LinksCommand),
}
