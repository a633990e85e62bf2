//! Transport abstraction layer for Parlor.
//!
//! Provides the [`Transport`] and [`Connection`] traits the gateway is
//! written against, plus the WebSocket implementation. The rest of the
//! server only ever sees "a text message arrived / send a text message /
//! the connection closed" — everything protocol-specific stays in here.

#![allow(async_fn_in_trait)]

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// The path and query parameters of a connection's upgrade request.
///
/// Captured during the WebSocket handshake so the gateway can read
/// `roomID`, `game`, and `quickPlayJoin` without the transport knowing
/// what any of them mean.
#[derive(Debug, Clone, Default)]
pub struct ConnectRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl ConnectRequest {
    /// Builds a request description from a raw path and optional query
    /// string (`"a=1&b=2"`). Parameters without a value parse as empty
    /// strings; empty pairs are dropped.
    pub fn parse(path: &str, query: Option<&str>) -> Self {
        let query = query
            .unwrap_or("")
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => {
                    (name.to_string(), value.to_string())
                }
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self {
            path: path.to_string(),
            query,
        }
    }

    /// The request path, as sent (e.g. `"/tictactoe/play"`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The first value of query parameter `name`, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `index`-th non-empty path segment
    /// (`"/tictactoe/play"` → segment 0 is `"tictactoe"`).
    pub fn path_segment(&self, index: usize) -> Option<&str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .nth(index)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection, returning it
    /// together with its upgrade-request parameters.
    async fn accept(
        &mut self,
    ) -> Result<(Self::Connection, ConnectRequest), Self::Error>;
}

/// A single connection that can send and receive text messages.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text message to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next complete text message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is closed (close frame or
    /// end of stream). Non-text frames are skipped.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
