//! Client session tracking for Parlor.
//!
//! A "session" is the server's record of one connected client:
//!
//! 1. **Identity** — an opaque [`ClientId`](parlor_protocol::ClientId)
//!    minted at accept time
//! 2. **Outbound channel** — how the core queues events for that client
//!    without touching the socket
//! 3. **Connection registry** — [`SessionManager`], the gateway's map of
//!    everyone currently connected
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)  ← holds Arc<ClientSession> references, never owns them
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Gateway (below)  ← owns sessions and their socket writer tasks
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::ClientSession;
