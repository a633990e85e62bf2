//! Identity and status types shared across the wire and the core.
//!
//! Everything here either travels on the wire (game status, chat sender
//! tags) or keys the maps that route messages (client/room/game-kind
//! identifiers). They live in the protocol crate so every layer above can
//! agree on them without depending on each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected client.
///
/// Newtype over a v4 UUID, generated server-side when a connection is
/// accepted. The id is immutable for the lifetime of the connection and is
/// the only thing the core layers use to refer to a client — never a
/// reference to the connection itself.
///
/// `#[serde(transparent)]` makes a `ClientId` serialize as the bare UUID
/// string, not as a wrapper object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Generates a fresh random client id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a room (one match instance).
///
/// Unlike [`ClientId`], room ids are supplied by clients (the frontend
/// generates one and puts it in the URL), so the gateway must parse and
/// validate them. `FromStr` accepts the standard hyphenated UUID form and
/// rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Generates a fresh random room id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RoomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a kind of game ("tictactoe", ...), used by the factory to
/// construct the right engine and echoed in quickplay responses.
///
/// The inner string is normalized to ASCII lowercase on construction, so
/// `"TicTacToe"` in a URL and `"tictactoe"` in the factory registry compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameKind(String);

impl GameKind {
    /// Creates a game kind, lowercasing the input.
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(kind.as_ref().to_ascii_lowercase())
    }

    /// The normalized kind string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// The lifecycle status of a game engine.
///
/// ```text
/// Playing ──(winning move)──→ Win
///    │
///    └─────(board exhausted)──→ Draw
/// ```
///
/// `Win` and `Draw` are terminal: once an engine reports either, no further
/// move is ever accepted and the status never changes again. Serializes as
/// the bare variant name (`"Playing"`, `"Win"`, `"Draw"`), which is the
/// `state` field of every `view` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Win,
    Draw,
}

impl GameStatus {
    /// Returns `true` once the game can no longer accept moves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => f.write_str("Playing"),
            Self::Win => f.write_str("Win"),
            Self::Draw => f.write_str("Draw"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat sender tag
// ---------------------------------------------------------------------------

/// Who sent a chat message: a seated player (by seat index) or an observer.
///
/// On the wire a seat is a bare number and an observer is the string
/// `"observer"`, so the JSON for the `from` field is either `0` / `1` / ...
/// or `"observer"`. The mixed representation needs hand-written serde impls
/// below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFrom {
    /// A seated player's seat index.
    Seat(usize),
    /// A client without a seat.
    Observer,
}

impl Serialize for ChatFrom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Seat(index) => serializer.serialize_u64(*index as u64),
            Self::Observer => serializer.serialize_str("observer"),
        }
    }
}

impl<'de> Deserialize<'de> for ChatFrom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FromVisitor;

        impl serde::de::Visitor<'_> for FromVisitor {
            type Value = ChatFrom;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a seat index or \"observer\"")
            }

            fn visit_u64<E>(self, v: u64) -> Result<ChatFrom, E>
            where
                E: serde::de::Error,
            {
                Ok(ChatFrom::Seat(v as usize))
            }

            fn visit_str<E>(self, v: &str) -> Result<ChatFrom, E>
            where
                E: serde::de::Error,
            {
                if v == "observer" {
                    Ok(ChatFrom::Observer)
                } else {
                    Err(E::invalid_value(
                        serde::de::Unexpected::Str(v),
                        &self,
                    ))
                }
            }
        }

        deserializer.deserialize_any(FromVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_serializes_as_bare_uuid() {
        let id = ClientId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_room_id_parses_hyphenated_uuid() {
        let id: RoomId =
            "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_room_id_rejects_garbage() {
        assert!("not-a-guid".parse::<RoomId>().is_err());
        assert!("".parse::<RoomId>().is_err());
    }

    #[test]
    fn test_game_kind_normalizes_case() {
        assert_eq!(GameKind::new("TicTacToe"), GameKind::new("tictactoe"));
        assert_eq!(GameKind::new("TicTacToe").as_str(), "tictactoe");
    }

    #[test]
    fn test_game_status_serializes_as_variant_name() {
        assert_eq!(
            serde_json::to_string(&GameStatus::Playing).unwrap(),
            "\"Playing\""
        );
        assert_eq!(
            serde_json::to_string(&GameStatus::Win).unwrap(),
            "\"Win\""
        );
        assert_eq!(
            serde_json::to_string(&GameStatus::Draw).unwrap(),
            "\"Draw\""
        );
    }

    #[test]
    fn test_game_status_terminal() {
        assert!(!GameStatus::Playing.is_terminal());
        assert!(GameStatus::Win.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
    }

    #[test]
    fn test_chat_from_seat_is_a_number() {
        let json = serde_json::to_string(&ChatFrom::Seat(1)).unwrap();
        assert_eq!(json, "1");
        let back: ChatFrom = serde_json::from_str("1").unwrap();
        assert_eq!(back, ChatFrom::Seat(1));
    }

    #[test]
    fn test_chat_from_observer_is_a_marker_string() {
        let json = serde_json::to_string(&ChatFrom::Observer).unwrap();
        assert_eq!(json, "\"observer\"");
        let back: ChatFrom = serde_json::from_str("\"observer\"").unwrap();
        assert_eq!(back, ChatFrom::Observer);
    }

    #[test]
    fn test_chat_from_rejects_other_strings() {
        let result: Result<ChatFrom, _> = serde_json::from_str("\"seat\"");
        assert!(result.is_err());
    }
}
