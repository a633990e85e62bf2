//! Wire protocol for Parlor.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Identity types** ([`ClientId`], [`RoomId`], [`GameKind`]) — the keys
//!   every other layer routes by.
//! - **Envelopes** ([`ClientEvent`], [`ServerEvent`]) — the JSON text
//!   messages that travel on the wire.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while parsing.
//!
//! The protocol layer sits between transport (text frames) and the room
//! core (sessions, engines). It doesn't know about connections or rooms —
//! it only knows message shapes.

mod error;
mod events;
mod types;

pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{ChatFrom, ClientId, GameKind, GameStatus, RoomId};
