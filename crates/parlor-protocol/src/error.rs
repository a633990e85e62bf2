//! Error types for the protocol layer.

/// Errors that can occur while parsing or encoding envelopes.
///
/// Per the error policy, none of these ever reach a client: the dispatch
/// layer logs them and drops the offending message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into JSON text).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing required fields,
    /// or wrong value types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates the envelope rules (e.g. a
    /// non-string `event` field).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The envelope named an event kind this protocol does not define.
    #[error("unrecognized event {0:?}")]
    UnknownEvent(String),
}
