//! The `Game` trait — the extension point every concrete game implements.
//!
//! An engine owns one match's board state, player roster, and turn logic.
//! It is pure: no I/O, no knowledge of connections or rooms. The room layer
//! calls into it while holding the room's guard, so implementations never
//! need their own synchronization.

use parlor_protocol::{ClientId, GameKind, GameStatus};
use serde_json::Value;

/// What an engine handed a joining client: a seat with move rights, or an
/// observer slot beyond the player limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAssignment {
    /// A player slot. Indices are dense (0, 1, ... up to
    /// `max_players() - 1`), assigned in join order, and never reused
    /// within one engine's lifetime.
    Seat(usize),
    /// A client past the player limit: receives broadcasts, cannot move.
    Observer,
}

impl SeatAssignment {
    /// The seat index, if this is a seated assignment.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Seat(index) => Some(*index),
            Self::Observer => None,
        }
    }
}

/// The contract between the room layer and a concrete game.
///
/// Mutating methods (`join`, `apply_move`) are only ever called under the
/// owning room's guard; read-only methods (`view`, `status`, `seat`) must be
/// safe to call at any time and must not mutate.
pub trait Game: Send + 'static {
    /// The kind tag this engine was registered under.
    fn kind(&self) -> GameKind;

    /// How many seated players this game supports.
    fn max_players(&self) -> usize;

    /// Admits a client. Idempotent: re-joining a known client returns its
    /// existing assignment. New clients get the next free seat, or become
    /// observers once all seats are taken.
    fn join(&mut self, client: ClientId) -> SeatAssignment;

    /// The client's seat index, or `None` for observers and strangers.
    fn seat(&self, client: ClientId) -> Option<usize>;

    /// Number of seats currently occupied.
    fn seated_count(&self) -> usize;

    /// Applies a move, returning whether observable state changed.
    ///
    /// Must refuse — returning `false` with no mutation — when the game is
    /// terminal, the client holds no seat, it is not that seat's turn, the
    /// payload does not deserialize into this game's move shape, or the
    /// move targets an occupied cell / out-of-range coordinate. On
    /// acceptance: mutate the board, advance the turn, recompute status.
    fn apply_move(&mut self, client: ClientId, payload: &Value) -> bool;

    /// Current lifecycle status. Immutable once terminal.
    fn status(&self) -> GameStatus;

    /// The serializable projection broadcast to clients.
    fn view(&self) -> Value;
}
