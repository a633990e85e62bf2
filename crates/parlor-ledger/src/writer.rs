//! The ledger writer: a detached task that keeps persistence off the
//! move path.
//!
//! Recording a win must never slow down or fail a game, so the room layer
//! talks to a [`LedgerWriter`] handle instead of the storage backend. The
//! handle pushes commands onto an unbounded channel; a spawned task drains
//! them into the [`WinLedger`] and swallows storage errors into the log.

use std::collections::HashMap;

use parlor_protocol::GameKind;
use tokio::sync::{mpsc, oneshot};

use crate::WinLedger;

/// Commands sent to the ledger task through its channel.
enum LedgerCommand {
    /// Credit one win. No reply — fire-and-forget.
    Record { game_kind: GameKind, alias: String },

    /// Read aggregate counts (the reporting side).
    Wins {
        game_kind: GameKind,
        reply: oneshot::Sender<HashMap<String, u64>>,
    },
}

/// Handle to the running ledger task. Cheap to clone.
#[derive(Clone)]
pub struct LedgerWriter {
    sender: mpsc::UnboundedSender<LedgerCommand>,
}

impl LedgerWriter {
    /// Queues a win record. Never blocks; if the ledger task is gone the
    /// record is dropped with a warning — gameplay is unaffected either
    /// way.
    pub fn record(&self, game_kind: GameKind, alias: String) {
        let dropped = self
            .sender
            .send(LedgerCommand::Record { game_kind, alias })
            .is_err();
        if dropped {
            tracing::warn!("ledger task gone, dropping win record");
        }
    }

    /// Reads aggregate win counts for `game_kind`.
    ///
    /// Returns an empty map when the ledger task is gone or its storage
    /// failed; reporting degrades, it never errors outward.
    pub async fn wins(&self, game_kind: GameKind) -> HashMap<String, u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self
            .sender
            .send(LedgerCommand::Wins {
                game_kind,
                reply: reply_tx,
            })
            .is_ok();
        if !sent {
            tracing::warn!("ledger task gone, returning empty win counts");
            return HashMap::new();
        }
        reply_rx.await.unwrap_or_default()
    }
}

/// Spawns the ledger task around a storage backend and returns its handle.
pub fn spawn_ledger<L: WinLedger>(mut ledger: L) -> LedgerWriter {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                LedgerCommand::Record { game_kind, alias } => {
                    if let Err(error) =
                        ledger.record_win(&game_kind, &alias)
                    {
                        tracing::warn!(
                            game = %game_kind,
                            %alias,
                            %error,
                            "failed to record win"
                        );
                    } else {
                        tracing::debug!(
                            game = %game_kind,
                            %alias,
                            "win recorded"
                        );
                    }
                }
                LedgerCommand::Wins { game_kind, reply } => {
                    let counts = match ledger.wins(&game_kind) {
                        Ok(counts) => counts,
                        Err(error) => {
                            tracing::warn!(
                                game = %game_kind,
                                %error,
                                "failed to read win counts"
                            );
                            HashMap::new()
                        }
                    };
                    let _ = reply.send(counts);
                }
            }
        }
    });

    LedgerWriter { sender: tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryLedger, LedgerError};

    #[tokio::test]
    async fn test_records_flow_through_to_storage() {
        let writer = spawn_ledger(InMemoryLedger::new());
        let kind = GameKind::new("tictactoe");

        writer.record(kind.clone(), "ada".into());
        writer.record(kind.clone(), "ada".into());

        // The queries queue behind the records on the same channel, so by
        // the time the reply arrives both records have been applied.
        let wins = writer.wins(kind).await;
        assert_eq!(wins.get("ada"), Some(&2));
    }

    #[tokio::test]
    async fn test_storage_failure_never_reaches_the_caller() {
        struct FailingLedger;

        impl WinLedger for FailingLedger {
            fn record_win(
                &mut self,
                _game_kind: &GameKind,
                _alias: &str,
            ) -> Result<(), LedgerError> {
                Err(LedgerError::Storage("disk on fire".into()))
            }

            fn wins(
                &self,
                _game_kind: &GameKind,
            ) -> Result<HashMap<String, u64>, LedgerError> {
                Err(LedgerError::Storage("disk on fire".into()))
            }
        }

        let writer = spawn_ledger(FailingLedger);
        let kind = GameKind::new("tictactoe");

        // Both calls degrade silently.
        writer.record(kind.clone(), "ada".into());
        let wins = writer.wins(kind).await;
        assert!(wins.is_empty());
    }
}
