//! Game engines for Parlor.
//!
//! A game engine owns one match: its board, its player roster, and its
//! turn/terminal logic. Engines are pure state machines behind the
//! [`Game`] trait — the room layer serializes access and moves the bytes.
//!
//! # Key types
//!
//! - [`Game`] — the trait every concrete game implements
//! - [`GameFactory`] — maps a [`GameKind`](parlor_protocol::GameKind) to a
//!   fresh engine
//! - [`tictactoe::TicTacToe`] — the reference two-player grid game

mod engine;
mod factory;
pub mod tictactoe;

pub use engine::{Game, SeatAssignment};
pub use factory::{GameConstructor, GameFactory};
