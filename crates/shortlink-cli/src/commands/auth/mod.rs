//! Account and session subcommands.

mod login;
mod logout;
mod refresh_token;
mod register;
mod status;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the access token
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored access token
    Logout(logout::LogoutArgs),

    /// Show whether an access token is stored
    Status(status::StatusArgs),

    /// Exchange the session for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),
}

pub async fn handle(cmd: AuthCommand, backend: &str) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, backend).await,
        AuthSubcommand::Register(args) => register::run(args, backend).await,
        AuthSubcommand::Logout(args) => logout::run(args, backend),
        AuthSubcommand::Status(args) => status::run(args, backend),
        AuthSubcommand::RefreshToken(args) => refresh_token::run(args, backend).await,
    }
}
