//! Core traits for the remote ledger and the session collaborator.

mod ledger;
mod session;

pub use ledger::{AssetMetadata, LedgerService};
pub use session::SessionProvider;
