//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use shortlink::Registration;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Email address for the new account
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Repeat the password (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

pub async fn run(args: RegisterArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;
    let confirm = args.confirm_password.as_deref().unwrap_or(&args.password);
    let registration = Registration::new(&args.username, &args.email, &args.password, confirm);

    eprintln!("{}", "Creating account...".dimmed());

    client
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    println!();
    output::field("Username", registration.username());
    output::field("Email", registration.email());
    eprintln!(
        "{}",
        "Run 'shortlink auth login' to sign in.".dimmed()
    );

    Ok(())
}
