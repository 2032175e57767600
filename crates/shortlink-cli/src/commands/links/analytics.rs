//! Analytics command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use shortlink::format_timestamp;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Link ID, as shown by 'links list --json'
    pub id: u64,

    /// Output the link as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AnalyticsArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    let url = client
        .analytics(args.id)
        .await
        .with_context(|| format!("Failed to load analytics for link {}", args.id))?;

    if args.json {
        return output::json_pretty(&url);
    }

    let now = Local::now();
    output::field("Title", &url.title);
    output::field("Short URL", &url.short_link(client.backend().as_str()));
    output::field("Destination", &url.long_url);
    output::field("Clicks", &url.clicks.to_string());
    output::field("Created", &format_timestamp(&url.created_at, &now));
    output::field("Updated", &format_timestamp(&url.updated_at, &now));

    Ok(())
}
