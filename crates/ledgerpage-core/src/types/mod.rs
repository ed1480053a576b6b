//! Core ledger types.
//!
//! These types enforce their invariants at construction time,
//! so invalid identifiers and URLs never reach the engine.

mod account;
mod ids;
mod service_url;

pub use account::AccountId;
pub use ids::{RecordId, TokenId};
pub use service_url::ServiceUrl;
