//! The room registry: creates, finds, and routes messages to rooms.
//!
//! This is the orchestration core. Every inbound envelope from the gateway
//! lands in [`RoomRegistry::dispatch`]; every outbound fan-out leaves
//! through [`RoomRegistry`]'s broadcast. The registry mutex is held only
//! for map operations — never across an engine lock or a send — so rooms
//! stay fully independent of each other.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use parlor_game::GameFactory;
use parlor_ledger::LedgerWriter;
use parlor_protocol::{
    ChatFrom, ClientEvent, ClientId, GameKind, GameStatus, RoomId,
    ServerEvent,
};
use parlor_session::ClientSession;
use serde_json::Value;

use crate::{Room, RoomError};

/// Concurrent mapping from room id to room, plus everything needed to
/// create rooms (the game factory) and to report wins (the ledger handle).
///
/// One registry serves the whole process; the gateway shares it across
/// connection tasks behind an `Arc`.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, Arc<Room>>>,
    factory: GameFactory,
    ledger: LedgerWriter,
}

impl RoomRegistry {
    /// Creates a registry with no rooms.
    pub fn new(factory: GameFactory, ledger: LedgerWriter) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            factory,
            ledger,
        }
    }

    /// Looks up a room by its id.
    pub fn find_by_room_id(&self, id: RoomId) -> Option<Arc<Room>> {
        self.lock_rooms().get(&id).cloned()
    }

    /// Finds the room a client is connected to.
    ///
    /// Linear scan over every room's client set. Fine at the scale a
    /// single process hosts; revisit with a reverse index if room counts
    /// ever grow past that.
    pub fn find_by_client_id(&self, id: ClientId) -> Option<Arc<Room>> {
        self.lock_rooms()
            .values()
            .find(|room| room.contains_client(id))
            .cloned()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.lock_rooms().len()
    }

    /// Adds `session` to the room `room_id`, creating the room (via the
    /// factory) if it doesn't exist yet. Under concurrent identical
    /// requests exactly one creator wins; everyone else joins the room it
    /// made. The engine assigns a seat or observer slot, and the current
    /// view goes to the joining client only.
    ///
    /// # Errors
    ///
    /// [`RoomError::UnknownGame`] when the room must be created but no
    /// engine is registered for `game_kind`.
    pub async fn join_or_create(
        &self,
        room_id: RoomId,
        game_kind: GameKind,
        session: &Arc<ClientSession>,
    ) -> Result<Arc<Room>, RoomError> {
        let room = {
            let mut rooms = self.lock_rooms();
            let room = match rooms.entry(room_id) {
                Entry::Occupied(entry) => Arc::clone(entry.get()),
                Entry::Vacant(entry) => {
                    let engine =
                        self.factory.create(&game_kind).ok_or_else(|| {
                            RoomError::UnknownGame(game_kind.clone())
                        })?;
                    let room = Arc::new(Room::new(
                        room_id,
                        game_kind.clone(),
                        engine,
                    ));
                    tracing::info!(
                        %room_id,
                        game = %game_kind,
                        "room created"
                    );
                    entry.insert(Arc::clone(&room));
                    room
                }
            };
            // Membership changes happen under the registry mutex so that
            // leave()'s remove-if-empty can't race a concurrent join.
            room.insert_client(Arc::clone(session));
            room
        };

        session.set_room(Some(room_id));
        room.join(session).await;
        Ok(room)
    }

    /// Removes `session` from whatever room it occupies, destroying the
    /// room if it empties. A client that never joined is a no-op, not an
    /// error.
    pub fn leave(&self, session: &ClientSession) {
        let mut rooms = self.lock_rooms();
        let Some(room) = rooms
            .values()
            .find(|room| room.contains_client(session.id()))
            .cloned()
        else {
            session.set_room(None);
            return;
        };

        let remaining = room.remove_client(session.id());
        tracing::info!(
            room = %room.id(),
            client = %session.id(),
            remaining,
            "client left room"
        );
        if remaining == 0 {
            rooms.remove(&room.id());
            tracing::info!(room = %room.id(), "room destroyed");
        }
        session.set_room(None);
    }

    /// Scans for the first room that is matchmaking-unlocked and still
    /// open (occupancy under the player limit, game still running).
    ///
    /// No reservation is made — the caller still goes through
    /// [`join_or_create`](Self::join_or_create), and if two quickplay
    /// callers race into the same room the engine's max-player enforcement
    /// turns the loser into an observer.
    pub async fn quick_play(&self) -> Option<(RoomId, GameKind)> {
        let candidates: Vec<Arc<Room>> =
            self.lock_rooms().values().cloned().collect();
        for room in candidates {
            if !room.is_locked() && room.is_open().await {
                return Some((room.id(), room.game_kind().clone()));
            }
        }
        None
    }

    /// Routes one raw inbound frame from `session`.
    ///
    /// Malformed envelopes, unknown events, and messages from clients in
    /// no room are logged and dropped — nothing at this layer ever answers
    /// a bad message, and nothing here can fail the connection.
    pub async fn dispatch(
        &self,
        session: &Arc<ClientSession>,
        raw: &str,
    ) {
        let event = match ClientEvent::parse(raw) {
            Ok(event) => event,
            Err(error) => {
                tracing::debug!(
                    client = %session.id(),
                    %error,
                    "dropping malformed message"
                );
                return;
            }
        };

        let Some(room) = self.find_by_client_id(session.id()) else {
            tracing::debug!(
                client = %session.id(),
                "message from client not in any room"
            );
            return;
        };

        match event {
            ClientEvent::Move { payload } => {
                self.handle_move(&room, session, payload).await;
            }
            ClientEvent::Lock { locked } => {
                self.handle_lock(&room, session, locked).await;
            }
            ClientEvent::Chat { text } => {
                self.handle_chat(&room, session, text).await;
            }
        }
    }

    /// Applies a move under the room guard; on a state change, broadcasts
    /// the new view and — when the move just won the game and the payload
    /// named the player — credits the win ledger, fire-and-forget.
    async fn handle_move(
        &self,
        room: &Arc<Room>,
        session: &Arc<ClientSession>,
        payload: Value,
    ) {
        let outcome = {
            let mut engine = room.engine().lock().await;
            if engine.apply_move(session.id(), &payload) {
                Some((engine.view(), engine.status()))
            } else {
                None
            }
        };

        let Some((view, status)) = outcome else {
            tracing::debug!(
                room = %room.id(),
                client = %session.id(),
                "move refused"
            );
            return;
        };

        self.broadcast(
            room,
            ServerEvent::View {
                value: view,
                state: status,
            },
        );

        if status == GameStatus::Win {
            if let Some(alias) =
                payload.get("alias").and_then(Value::as_str)
            {
                self.ledger
                    .record(room.game_kind().clone(), alias.to_string());
            }
        }
    }

    /// Toggles the matchmaking lock. Only the seat-0 occupant may do this;
    /// everyone else is ignored.
    async fn handle_lock(
        &self,
        room: &Arc<Room>,
        session: &Arc<ClientSession>,
        locked: bool,
    ) {
        let seat = room.engine().lock().await.seat(session.id());
        if seat != Some(0) {
            tracing::debug!(
                room = %room.id(),
                client = %session.id(),
                "lock toggle from non-host ignored"
            );
            return;
        }
        room.set_locked(locked);
        tracing::info!(room = %room.id(), locked, "room lock toggled");
        self.broadcast(room, ServerEvent::RoomLocked { locked });
    }

    /// Relays a chat line to the whole room, tagged with the sender's
    /// seat. No persistence, no moderation.
    async fn handle_chat(
        &self,
        room: &Arc<Room>,
        session: &Arc<ClientSession>,
        text: String,
    ) {
        let from = match room.engine().lock().await.seat(session.id()) {
            Some(index) => ChatFrom::Seat(index),
            None => ChatFrom::Observer,
        };
        self.broadcast(room, ServerEvent::Chat { chat: text, from });
    }

    /// Sends `event` to every client in the room.
    ///
    /// Iterates a snapshot of the client set; a failed send evicts that
    /// one client and the broadcast carries on for the rest.
    pub fn broadcast(&self, room: &Arc<Room>, event: ServerEvent) {
        let recipients = room.client_snapshot();
        let mut unreachable = Vec::new();
        for session in &recipients {
            if session.send(event.clone()).is_err() {
                unreachable.push(session.id());
            }
        }
        for client in unreachable {
            tracing::debug!(
                room = %room.id(),
                %client,
                "evicting unreachable client"
            );
            self.evict(room, client);
        }
    }

    /// Removes a dead client discovered mid-broadcast, destroying the room
    /// if it empties. The `ptr_eq` check guards against the id having been
    /// re-bound to a different room between snapshot and eviction.
    fn evict(&self, room: &Arc<Room>, client: ClientId) {
        let mut rooms = self.lock_rooms();
        let remaining = room.remove_client(client);
        if remaining == 0 {
            let still_registered = rooms
                .get(&room.id())
                .is_some_and(|current| Arc::ptr_eq(current, room));
            if still_registered {
                rooms.remove(&room.id());
                tracing::info!(room = %room.id(), "room destroyed");
            }
        }
    }

    fn lock_rooms(
        &self,
    ) -> MutexGuard<'_, HashMap<RoomId, Arc<Room>>> {
        self.rooms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
