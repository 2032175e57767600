//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use shortlink::UrlQuery;
use shortlink::links::DEFAULT_PAGE_LIMIT;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Links per page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Only links whose title or URL matches
    #[arg(long)]
    pub search: Option<String>,

    /// Sort order, as understood by the backend
    #[arg(long)]
    pub sort: Option<String>,

    /// Output the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    let mut query = UrlQuery::new().page(args.page).limit(args.limit);
    if let Some(search) = args.search {
        query = query.search(search);
    }
    if let Some(sort) = args.sort {
        query = query.sort(sort);
    }

    let page = client
        .list_urls(&query)
        .await
        .context("Failed to list links")?;

    if args.json {
        return output::json(&page);
    }

    if page.urls.is_empty() {
        eprintln!("{}", "No links found.".dimmed());
        return Ok(());
    }

    for url in &page.urls {
        output::link_row(url, client.backend().as_str());
    }

    if let Some(pages) = output::page_bar(page.page, page.total_pages) {
        eprintln!();
        eprintln!("{}", pages);
    }

    Ok(())
}
