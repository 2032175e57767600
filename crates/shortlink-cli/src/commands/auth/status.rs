//! Status command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    output::field("Backend", client.backend().as_str());
    output::field("Token file", &session::token_path()?.display().to_string());
    output::field(
        "Logged in",
        if client.is_authenticated() { "yes" } else { "no" },
    );

    Ok(())
}
