//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(_args: WhoamiArgs) -> Result<()> {
    let session = storage::require_session()?;
    let config = session.feed_config(None)?;

    output::field("Account", session.account.as_str());
    output::field("Service", session.service.as_str());
    output::field("Page size", &config.page_size.to_string());

    Ok(())
}
