//! Output formatting helpers.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use shortlink::ShortUrl;
use shortlink::format_timestamp;
use shortlink::pagination::{PageItem, page_window};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print one link as a single line: id, short URL, clicks, age, destination.
pub fn link_row(url: &ShortUrl, base: &str) {
    let title = if url.title.is_empty() {
        String::new()
    } else {
        format!(" {}", url.title.bold())
    };

    println!(
        "{:>5}  {}{}  {} clicks  {}",
        url.id.to_string().dimmed(),
        url.short_link(base).cyan(),
        title,
        url.clicks,
        format_timestamp(&url.created_at, &Local::now()).dimmed(),
    );
    println!("       {} {}", "→".dimmed(), url.long_url);
}

/// Render page navigation, e.g. `1 … 4 [5] 6 … 10`. `None` for a single page.
pub fn page_bar(current: u32, total: u32) -> Option<String> {
    let items = page_window(current, total);
    if items.is_empty() {
        return None;
    }

    let slots: Vec<String> = items
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == current => format!("[{}]", page).bold().to_string(),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect();

    Some(format!("{} {}", "Pages:".dimmed(), slots.join(" ")))
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
