//! The reference game: a two-player 3×3 marking game.
//!
//! Seat 0 places [`Cell::MarkA`], seat 1 places [`Cell::MarkB`], turns
//! alternate after every accepted move, and the status is recomputed by
//! scanning all rows, columns, and both diagonals. Cells serialize as
//! `0`/`1`/`2` — the constants the canvas frontend draws from.

use std::collections::HashSet;

use parlor_protocol::{ClientId, GameKind, GameStatus};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Game, SeatAssignment};

/// The registered kind string for this game.
pub const KIND: &str = "tictactoe";

/// Board side length.
const GRID: usize = 3;

/// Seated players.
const MAX_PLAYERS: usize = 2;

/// One square of the grid. A cell, once marked, is never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    MarkA,
    MarkB,
}

/// Cells travel as small integers, not variant names.
impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let code: u8 = match self {
            Self::Empty => 0,
            Self::MarkA => 1,
            Self::MarkB => 2,
        };
        serializer.serialize_u8(code)
    }
}

/// The move shape this engine accepts. Extra envelope fields (`event`,
/// `alias`) are ignored by serde's default tolerance for unknown keys.
#[derive(Debug, Deserialize)]
struct MovePayload {
    row: usize,
    col: usize,
}

/// One match of the grid game.
pub struct TicTacToe {
    board: [[Cell; GRID]; GRID],
    /// Seat order is join order: `seats[0]` is seat 0.
    seats: Vec<ClientId>,
    observers: HashSet<ClientId>,
    /// Seat index whose turn it is.
    turn: usize,
    status: GameStatus,
}

impl TicTacToe {
    /// Creates an empty board with no players.
    pub fn new() -> Self {
        Self {
            board: [[Cell::Empty; GRID]; GRID],
            seats: Vec::new(),
            observers: HashSet::new(),
            turn: 0,
            status: GameStatus::Playing,
        }
    }

    /// The [`GameKind`] this engine registers under.
    pub fn game_kind() -> GameKind {
        GameKind::new(KIND)
    }

    fn mark_for(seat: usize) -> Cell {
        if seat == 0 { Cell::MarkA } else { Cell::MarkB }
    }

    /// Scans the whole board and reports the status it implies.
    fn evaluate(&self) -> GameStatus {
        let b = &self.board;

        let three = |a: Cell, b: Cell, c: Cell| {
            a != Cell::Empty && a == b && b == c
        };

        for i in 0..GRID {
            if three(b[i][0], b[i][1], b[i][2])
                || three(b[0][i], b[1][i], b[2][i])
            {
                return GameStatus::Win;
            }
        }
        if three(b[0][0], b[1][1], b[2][2])
            || three(b[0][2], b[1][1], b[2][0])
        {
            return GameStatus::Win;
        }

        let full = b
            .iter()
            .all(|row| row.iter().all(|cell| *cell != Cell::Empty));
        if full {
            GameStatus::Draw
        } else {
            GameStatus::Playing
        }
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    fn kind(&self) -> GameKind {
        Self::game_kind()
    }

    fn max_players(&self) -> usize {
        MAX_PLAYERS
    }

    fn join(&mut self, client: ClientId) -> SeatAssignment {
        if let Some(index) =
            self.seats.iter().position(|seated| *seated == client)
        {
            return SeatAssignment::Seat(index);
        }
        if self.observers.contains(&client) {
            return SeatAssignment::Observer;
        }
        if self.seats.len() < MAX_PLAYERS {
            self.seats.push(client);
            SeatAssignment::Seat(self.seats.len() - 1)
        } else {
            self.observers.insert(client);
            SeatAssignment::Observer
        }
    }

    fn seat(&self, client: ClientId) -> Option<usize> {
        self.seats.iter().position(|seated| *seated == client)
    }

    fn seated_count(&self) -> usize {
        self.seats.len()
    }

    fn apply_move(&mut self, client: ClientId, payload: &Value) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(seat) = self.seat(client) else {
            return false;
        };
        if seat != self.turn {
            return false;
        }
        let Ok(mv) = serde_json::from_value::<MovePayload>(payload.clone())
        else {
            return false;
        };
        if mv.row >= GRID || mv.col >= GRID {
            return false;
        }
        if self.board[mv.row][mv.col] != Cell::Empty {
            return false;
        }

        self.board[mv.row][mv.col] = Self::mark_for(seat);
        self.turn = (self.turn + 1) % MAX_PLAYERS;
        self.status = self.evaluate();
        true
    }

    fn status(&self) -> GameStatus {
        self.status
    }

    fn view(&self) -> Value {
        json!({
            "board": self.board,
            "turn": self.turn,
        })
    }
}

// =========================================================================
// Tests
// =========================================================================
