//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ledgerpage_core::{AccountId, ServiceUrl};

use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account principal to browse as
    #[arg(long)]
    pub account: String,

    /// Ledger service base URL
    #[arg(long, env = "LEDGERPAGE_SERVICE")]
    pub service: String,

    /// Records requested per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

pub fn run(args: LoginArgs) -> Result<()> {
    let account = AccountId::new(&args.account).context("Invalid account")?;
    let service = ServiceUrl::new(&args.service).context("Invalid service URL")?;

    let session = CliSession {
        account,
        service,
        page_size: args.page_size,
    };
    session.feed_config(None)?;

    storage::save_session(&session).context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("Account", session.account.as_str());
    output::field("Service", session.service.as_str());

    Ok(())
}
