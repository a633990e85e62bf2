//! Error types for the room layer.

use parlor_protocol::GameKind;

/// Errors that can occur during room operations.
///
/// Deliberately small: rule violations and malformed messages are not
/// errors here (they are dropped inside dispatch), so the only thing a
/// caller can get wrong is asking for a game nobody registered.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No engine is registered for the requested game kind.
    #[error("no game registered for kind \"{0}\"")]
    UnknownGame(GameKind),
}
