//! The message envelopes that travel between clients and the server.
//!
//! Every message is a JSON text frame shaped `{ "event": "...", ...payload }`.
//! Inbound frames become a [`ClientEvent`]; outbound frames are serialized
//! from a [`ServerEvent`]. The two directions are deliberately asymmetric:
//!
//! - Outbound messages are fully typed, so `#[serde(tag = "event")]` derives
//!   the wire shape.
//! - Inbound `move` payloads are game-specific and opaque to this layer, so
//!   parsing keeps the raw [`serde_json::Value`] and hands it to the engine —
//!   the same pass-through the engine-agnostic router needs for any game.
//!
//! A frame with no `event` field at all is treated as a `move`; early
//! frontends sent bare move payloads and the server still accepts them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ChatFrom, GameKind, GameStatus, ProtocolError, RoomId};

/// Event name used when the inbound envelope carries none.
const DEFAULT_EVENT: &str = "move";

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A parsed inbound envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A game move. The payload is the whole envelope, uninterpreted —
    /// only the receiving engine knows its shape (and `alias`, if present,
    /// is read by the win-attribution path).
    Move { payload: Value },

    /// Toggle the room's matchmaking lock.
    Lock { locked: bool },

    /// A chat line to relay to the room.
    Chat { text: String },
}

#[derive(Deserialize)]
struct LockPayload {
    locked: bool,
}

#[derive(Deserialize)]
struct ChatPayload {
    text: String,
}

impl ClientEvent {
    /// Parses a raw text frame into a `ClientEvent`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] for frames that are not valid JSON
    /// or whose payload is missing required fields,
    /// [`ProtocolError::InvalidMessage`] when `event` is present but not a
    /// string, and [`ProtocolError::UnknownEvent`] for event names this
    /// protocol does not define. Callers drop-and-log on every variant.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(raw).map_err(ProtocolError::Decode)?;

        let event = match value.get("event") {
            None => DEFAULT_EVENT,
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(ProtocolError::InvalidMessage(
                    "event field must be a string".into(),
                ));
            }
        };

        match event {
            "move" => Ok(Self::Move { payload: value }),
            "room.lock" => {
                let payload: LockPayload = serde_json::from_value(value)
                    .map_err(ProtocolError::Decode)?;
                Ok(Self::Lock {
                    locked: payload.locked,
                })
            }
            "chat" => {
                let payload: ChatPayload = serde_json::from_value(value)
                    .map_err(ProtocolError::Decode)?;
                Ok(Self::Chat {
                    text: payload.text,
                })
            }
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An outbound envelope, serialized with `event` as the tag field.
///
/// `Deserialize` is derived too so integration tests (and Rust clients) can
/// read frames back with the same types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// The engine's current view, sent to one client on join and broadcast
    /// to the whole room after every accepted move.
    #[serde(rename = "view")]
    View {
        value: Value,
        state: GameStatus,
    },

    /// The room's matchmaking-lock flag changed.
    #[serde(rename = "room.locked")]
    RoomLocked { locked: bool },

    /// A relayed chat line, tagged with the sender's seat.
    #[serde(rename = "chat")]
    Chat { chat: String, from: ChatFrom },

    /// A quickplay request matched an open room; the client should
    /// reconnect to it.
    #[serde(rename = "quickPlayJoined", rename_all = "camelCase")]
    QuickPlayJoined {
        room_id: RoomId,
        game_kind: GameKind,
    },

    /// A quickplay request found no open room.
    #[serde(rename = "nofree")]
    NoFree,

    /// The connection's parameters were unusable; the socket closes after
    /// this.
    #[serde(rename = "error")]
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire shapes are a contract with the JS frontends; these tests
    //! pin the exact JSON for each event kind.

    use serde_json::json;

    use super::*;

    // =====================================================================
    // Inbound parsing
    // =====================================================================

    #[test]
    fn test_parse_move_event() {
        let event =
            ClientEvent::parse(r#"{"event":"move","row":1,"col":2}"#)
                .unwrap();
        match event {
            ClientEvent::Move { payload } => {
                assert_eq!(payload["row"], 1);
                assert_eq!(payload["col"], 2);
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults_to_move_when_event_absent() {
        let event = ClientEvent::parse(r#"{"row":0,"col":0}"#).unwrap();
        assert!(matches!(event, ClientEvent::Move { .. }));
    }

    #[test]
    fn test_parse_lock_event() {
        let event =
            ClientEvent::parse(r#"{"event":"room.lock","locked":true}"#)
                .unwrap();
        assert_eq!(event, ClientEvent::Lock { locked: true });
    }

    #[test]
    fn test_parse_lock_without_flag_is_malformed() {
        let result = ClientEvent::parse(r#"{"event":"room.lock"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_parse_chat_event() {
        let event =
            ClientEvent::parse(r#"{"event":"chat","text":"gg"}"#).unwrap();
        assert_eq!(event, ClientEvent::Chat { text: "gg".into() });
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        let result = ClientEvent::parse(r#"{"event":"dance"}"#);
        assert!(matches!(
            result,
            Err(ProtocolError::UnknownEvent(name)) if name == "dance"
        ));
    }

    #[test]
    fn test_parse_rejects_non_string_event() {
        let result = ClientEvent::parse(r#"{"event":7}"#);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ClientEvent::parse("not json").is_err());
        assert!(ClientEvent::parse("").is_err());
    }

    // =====================================================================
    // Outbound shapes
    // =====================================================================

    #[test]
    fn test_view_event_shape() {
        let event = ServerEvent::View {
            value: json!({"board": [[0, 0, 0]]}),
            state: GameStatus::Playing,
        };
        let wire: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["event"], "view");
        assert_eq!(wire["state"], "Playing");
        assert_eq!(wire["value"]["board"][0][1], 0);
    }

    #[test]
    fn test_room_locked_event_shape() {
        let wire: Value =
            serde_json::to_value(ServerEvent::RoomLocked { locked: true })
                .unwrap();
        assert_eq!(wire["event"], "room.locked");
        assert_eq!(wire["locked"], true);
    }

    #[test]
    fn test_chat_event_shape() {
        let wire: Value = serde_json::to_value(ServerEvent::Chat {
            chat: "hello".into(),
            from: ChatFrom::Seat(0),
        })
        .unwrap();
        assert_eq!(wire["event"], "chat");
        assert_eq!(wire["chat"], "hello");
        assert_eq!(wire["from"], 0);
    }

    #[test]
    fn test_quick_play_joined_event_shape() {
        let room_id = RoomId::new();
        let wire: Value =
            serde_json::to_value(ServerEvent::QuickPlayJoined {
                room_id,
                game_kind: GameKind::new("tictactoe"),
            })
            .unwrap();
        assert_eq!(wire["event"], "quickPlayJoined");
        assert_eq!(wire["roomId"], room_id.to_string());
        assert_eq!(wire["gameKind"], "tictactoe");
    }

    #[test]
    fn test_nofree_event_shape() {
        let wire: Value = serde_json::to_value(ServerEvent::NoFree).unwrap();
        assert_eq!(wire, json!({"event": "nofree"}));
    }

    #[test]
    fn test_error_event_shape() {
        let wire: Value = serde_json::to_value(ServerEvent::Error {
            message: "Missing or invalid roomID".into(),
        })
        .unwrap();
        assert_eq!(wire["event"], "error");
        assert_eq!(wire["message"], "Missing or invalid roomID");
    }

    #[test]
    fn test_server_event_round_trip() {
        let event = ServerEvent::Chat {
            chat: "hi".into(),
            from: ChatFrom::Observer,
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(event, back);
    }
}
