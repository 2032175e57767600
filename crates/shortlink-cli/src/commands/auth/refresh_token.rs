//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    eprintln!("{}", "Refreshing access token...".dimmed());

    client
        .refresh()
        .await
        .context("Failed to refresh access token")?;

    output::success("Access token refreshed");
    output::field("Backend", client.backend().as_str());

    Ok(())
}
