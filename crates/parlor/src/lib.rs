//! # Parlor
//!
//! A turn-based multiplayer session server for web games.
//!
//! Clients connect over WebSocket, are grouped into rooms, and exchange
//! moves that the server validates and broadcasts — the server is the sole
//! authority over game state. New games plug in by implementing the
//! [`Game`](parlor_game::Game) trait and registering with the
//! [`GameFactory`](parlor_game::GameFactory); the room registry, gateway,
//! and matchmaking never change.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let server = ParlorServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(InMemoryLedger::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod gateway;
mod server;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

/// The common imports for building and running a server.
pub mod prelude {
    pub use parlor_game::{Game, GameFactory, SeatAssignment};
    pub use parlor_ledger::{InMemoryLedger, LedgerWriter, WinLedger};
    pub use parlor_protocol::{
        ChatFrom, ClientEvent, ClientId, GameKind, GameStatus, RoomId,
        ServerEvent,
    };
    pub use parlor_room::{Room, RoomRegistry};
    pub use parlor_session::ClientSession;

    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder};
}
