//! ledgerpage-rpc - HTTP/JSON binding of the ledger service.
//!
//! Every method is a `GET {service}/rpc/{method}` with query parameters and
//! a JSON body in response.

mod client;
mod endpoints;
mod ledger;
mod session;

pub use client::RpcClient;
pub use ledger::RpcLedger;
pub use session::StaticSession;
