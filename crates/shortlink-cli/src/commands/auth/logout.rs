//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    if let Err(e) = client.credential() {
        output::warning(&e.message());
        return Ok(());
    }

    client.logout();
    output::success("Logged out");

    Ok(())
}
