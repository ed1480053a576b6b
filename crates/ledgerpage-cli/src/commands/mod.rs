//! Subcommand implementations.

mod feed;
mod listings;
mod login;
mod logout;
mod revenue;
mod whoami;

use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the account and service to browse with
    Login(login::LoginArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Forget the active session
    Logout(logout::LogoutArgs),

    /// Page through marketplace listings
    Listings(listings::ListingsArgs),

    /// Page through revenue paid to the active account
    Revenue(revenue::RevenueArgs),
}

pub async fn handle(cmd: Command) -> Result<()> {
    match cmd {
        Command::Login(args) => login::run(args),
        Command::Whoami(args) => whoami::run(args),
        Command::Logout(args) => logout::run(args),
        Command::Listings(args) => listings::run(args).await,
        Command::Revenue(args) => revenue::run(args).await,
    }
}
