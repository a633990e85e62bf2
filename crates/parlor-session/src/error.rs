//! Error types for the session layer.

use parlor_protocol::ClientId;

/// Errors that can occur when talking to a client session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session's outbound channel is closed — the connection's writer
    /// task is gone. The client is unreachable and should be evicted.
    #[error("outbound channel closed for client {0}")]
    ChannelClosed(ClientId),
}
