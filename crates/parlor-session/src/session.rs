//! Session types: the server's record of one connected client.

use std::sync::Mutex;

use parlor_protocol::{ClientId, RoomId, ServerEvent};
use tokio::sync::mpsc;

use crate::SessionError;

/// One connected client.
///
/// Created by the gateway when a connection is accepted and destroyed when
/// it closes. The identity is immutable for the session's lifetime; the
/// room slot tracks which room (if any) the client currently occupies.
///
/// The outbound half of the connection lives here as an unbounded channel
/// sender. The gateway owns the matching receiver (its writer task drains
/// events onto the socket); the room core only ever holds
/// `Arc<ClientSession>` references, so a disconnecting client can never
/// leave a dangling socket inside a room — just a closed channel, which the
/// next send notices.
#[derive(Debug)]
pub struct ClientSession {
    id: ClientId,
    room: Mutex<Option<RoomId>>,
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

impl ClientSession {
    /// Creates a session and the receiver for its outbound events.
    pub fn new(
        id: ClientId,
    ) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id,
                room: Mutex::new(None),
                outbound: tx,
            },
            rx,
        )
    }

    /// The client's immutable identity.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// The room this client currently occupies, if any.
    pub fn room(&self) -> Option<RoomId> {
        *self
            .room
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records (or clears) the client's current room.
    pub fn set_room(&self, room: Option<RoomId>) {
        *self
            .room
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = room;
    }

    /// Queues an event for delivery to this client.
    ///
    /// Never blocks. Fails only when the connection's writer is gone,
    /// which callers treat as "this client is unreachable".
    pub fn send(&self, event: ServerEvent) -> Result<(), SessionError> {
        self.outbound
            .send(event)
            .map_err(|_| SessionError::ChannelClosed(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reaches_the_receiver() {
        let (session, mut rx) = ClientSession::new(ClientId::new());
        session.send(ServerEvent::NoFree).unwrap();
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::NoFree);
    }

    #[test]
    fn test_send_fails_once_receiver_is_gone() {
        let (session, rx) = ClientSession::new(ClientId::new());
        drop(rx);
        let err = session.send(ServerEvent::NoFree).unwrap_err();
        assert!(matches!(err, SessionError::ChannelClosed(id) if id == session.id()));
    }

    #[test]
    fn test_room_slot_starts_empty_and_round_trips() {
        let (session, _rx) = ClientSession::new(ClientId::new());
        assert_eq!(session.room(), None);

        let room = RoomId::new();
        session.set_room(Some(room));
        assert_eq!(session.room(), Some(room));

        session.set_room(None);
        assert_eq!(session.room(), None);
    }
}
