//! The `WinLedger` storage trait and its in-memory implementation.

use std::collections::HashMap;

use parlor_protocol::GameKind;

use crate::LedgerError;

/// Storage backend for aggregate win counts.
///
/// Implementations own their storage entirely; the server never calls this
/// trait directly from the move path — see
/// [`spawn_ledger`](crate::spawn_ledger) for the decoupling layer. Keeping
/// the trait synchronous keeps it object-simple and lets tests substitute a
/// recording fake with no runtime involved.
pub trait WinLedger: Send + 'static {
    /// Credits one win to `alias` under `game_kind`.
    fn record_win(
        &mut self,
        game_kind: &GameKind,
        alias: &str,
    ) -> Result<(), LedgerError>;

    /// Aggregate win counts per alias for `game_kind`.
    fn wins(
        &self,
        game_kind: &GameKind,
    ) -> Result<HashMap<String, u64>, LedgerError>;
}

/// Ledger that keeps win counts in process memory.
///
/// The default backend for development servers and tests; counts vanish on
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    wins: HashMap<GameKind, HashMap<String, u64>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl WinLedger for InMemoryLedger {
    fn record_win(
        &mut self,
        game_kind: &GameKind,
        alias: &str,
    ) -> Result<(), LedgerError> {
        *self
            .wins
            .entry(game_kind.clone())
            .or_default()
            .entry(alias.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    fn wins(
        &self,
        game_kind: &GameKind,
    ) -> Result<HashMap<String, u64>, LedgerError> {
        Ok(self.wins.get(game_kind).cloned().unwrap_or_default())
    }
}
