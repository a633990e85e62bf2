//! Win-count ledger for Parlor.
//!
//! The ledger answers exactly two questions — "record a win for
//! (game kind, alias)" and "what are the aggregate counts for a game
//! kind" — and it answers them off the gameplay path:
//!
//! - [`WinLedger`] — the storage trait ([`InMemoryLedger`] is the shipped
//!   backend; tests substitute fakes)
//! - [`spawn_ledger`] / [`LedgerWriter`] — the detached task + handle that
//!   make recording fire-and-forget, so a slow or failing store can never
//!   stall a room

mod error;
mod store;
mod writer;

pub use error::LedgerError;
pub use store::{InMemoryLedger, WinLedger};
pub use writer::{spawn_ledger, LedgerWriter};
