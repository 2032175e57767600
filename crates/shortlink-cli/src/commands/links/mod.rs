//! Short link subcommands.

mod analytics;
mod dashboard;
mod list;
mod shorten;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct LinksCommand {
    #[command(subcommand)]
    pub command: LinksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LinksSubcommand {
    /// Create a short link
    Shorten(shorten::ShortenArgs),

    /// List your short links
    List(list::ListArgs),

    /// Show totals and the most recent links
    Dashboard(dashboard::DashboardArgs),

    /// Show details and clicks for one link
    Analytics(analytics::AnalyticsArgs),
}

pub async fn handle(cmd: LinksCommand, backend: &str) -> Result<()> {
    match cmd.command {
        LinksSubcommand::Shorten(args) => shorten::run(args, backend).await,
        LinksSubcommand::List(args) => list::run(args, backend).await,
        LinksSubcommand::Dashboard(args) => dashboard::run(args, backend).await,
        LinksSubcommand::Analytics(args) => analytics::run(args, backend).await,
    }
}
