//! Infrastructure layer
//!
//! Platform storage backends and the JSON-RPC ledger client. Everything in
//! here sits behind a trait so the core modules can be exercised against
//! in-memory fakes.

pub mod platform;
pub mod rpc;

pub use platform::{FileStorage, MemoryStorage, PlatformStorage};
pub use rpc::{JsonRpcLedger, LedgerRpc};
