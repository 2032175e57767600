//! Dashboard command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: DashboardArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    let summary = client
        .dashboard()
        .await
        .context("Failed to load dashboard")?;

    if args.json {
        return output::json_pretty(&summary);
    }

    if !summary.username.is_empty() {
        println!("Welcome back, {}", summary.username.bold());
        println!();
    }

    output::field("Links", &summary.total_links.to_string());
    output::field("Clicks", &summary.total_clicks.to_string());
    output::field(
        "Clicks per link",
        &format!("{:.1}", summary.average_clicks_per_link),
    );

    if summary.latest_urls.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Latest links".bold());
    for url in &summary.latest_urls {
        output::link_row(url, client.backend().as_str());
    }

    Ok(())
}
