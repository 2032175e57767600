//! Shorten command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use shortlink::{Alias, LongUrl, NewShortUrl};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ShortenArgs {
    /// Destination URL
    pub url: String,

    /// Display title
    #[arg(long)]
    pub title: Option<String>,

    /// Custom short code
    #[arg(long)]
    pub alias: Option<String>,

    /// Output the created link as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ShortenArgs, backend: &str) -> Result<()> {
    let url = LongUrl::new(&args.url).context("Invalid URL")?;

    let mut link = NewShortUrl::new(url);
    if let Some(title) = args.title {
        link = link.title(title);
    }
    if let Some(alias) = args.alias {
        link = link.custom_alias(Alias::new(alias).context("Invalid alias")?);
    }

    let client = session::connect(backend)?;

    eprintln!("{}", "Creating short link...".dimmed());

    let created = client
        .shorten(&link)
        .await
        .context("Failed to create short link")?;

    if args.json {
        return output::json_pretty(&created);
    }

    output::success("Short link created");
    println!();
    output::field("Short URL", &created.short_link(client.backend().as_str()));
    output::field("Destination", &created.long_url);
    output::field("ID", &created.id.to_string());

    Ok(())
}
