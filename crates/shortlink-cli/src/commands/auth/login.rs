//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use shortlink::LoginCredentials;
use shortlink::auth::AccessToken;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long, required_unless_present = "token", requires = "password")]
    pub username: Option<String>,

    /// Account password
    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// Use an access token issued elsewhere instead of a password
    #[arg(long, conflicts_with_all = ["username", "password"])]
    pub token: Option<String>,
}

pub async fn run(args: LoginArgs, backend: &str) -> Result<()> {
    let client = session::connect(backend)?;

    let username = match (args.token, args.username, args.password) {
        (Some(token), _, _) => {
            client
                .use_token(AccessToken::new(token))
                .context("Failed to store access token")?;
            None
        }
        (None, Some(username), Some(password)) => {
            eprintln!("{}", "Logging in...".dimmed());
            client
                .login(LoginCredentials::new(&username, &password))
                .await
                .context("Failed to login")?;
            Some(username)
        }
        _ => anyhow::bail!("Provide --username and --password, or --token"),
    };

    output::success("Logged in successfully");
    println!();
    if let Some(username) = &username {
        output::field("Username", username);
    }
    output::field("Backend", client.backend().as_str());

    Ok(())
}
