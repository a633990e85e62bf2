//! Error types for the ledger layer.

/// Errors a ledger backend can report.
///
/// These stop at the ledger task's log output; neither game state nor any
/// client-visible behavior depends on a ledger call succeeding.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The backing store rejected or lost the operation.
    #[error("ledger storage failed: {0}")]
    Storage(String),
}
