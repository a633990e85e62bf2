//! A room: one game engine plus the clients watching it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use parlor_game::Game;
use parlor_protocol::{ClientId, GameKind, GameStatus, RoomId, ServerEvent};
use parlor_session::ClientSession;
use tokio::sync::Mutex;

/// One concurrent match: an exclusively-owned engine, the set of connected
/// clients, and the guard that serializes every engine mutation.
///
/// The engine mutex is the room's one hard correctness tool: every `join`
/// and `apply_move` goes through it, so two clients hammering the same room
/// are strictly serialized while different rooms proceed in parallel.
///
/// The client map holds `Arc<ClientSession>` references — the gateway owns
/// client lifetime, the room only addresses them. Rooms never outlive their
/// members: the registry removes a room the moment its client map empties.
pub struct Room {
    id: RoomId,
    game_kind: GameKind,
    engine: Mutex<Box<dyn Game>>,
    clients: StdMutex<HashMap<ClientId, Arc<ClientSession>>>,
    /// When set, quickplay skips this room. Toggled by the seat-0 player.
    locked: AtomicBool,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        game_kind: GameKind,
        engine: Box<dyn Game>,
    ) -> Self {
        Self {
            id,
            game_kind,
            engine: Mutex::new(engine),
            clients: StdMutex::new(HashMap::new()),
            locked: AtomicBool::new(false),
        }
    }

    /// The room's unique id.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// The kind of game running in this room.
    pub fn game_kind(&self) -> &GameKind {
        &self.game_kind
    }

    /// The guard around the engine. Callers hold it for exactly one
    /// state-mutating operation.
    pub(crate) fn engine(&self) -> &Mutex<Box<dyn Game>> {
        &self.engine
    }

    /// Whether the seat-0 player has locked this room out of matchmaking.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    pub(crate) fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::Relaxed);
    }

    /// Whether quickplay may route a new player here: fewer clients than
    /// the game's player limit, and the game still running. Occupancy is
    /// counted from the client map, not the engine's seat list — a player
    /// who left reopens the room even though their seat is never reused.
    /// (The matchmaking lock is checked separately.)
    pub async fn is_open(&self) -> bool {
        let engine = self.engine.lock().await;
        self.client_count() < engine.max_players()
            && engine.status() == GameStatus::Playing
    }

    /// Number of connected clients (seated or observing).
    pub fn client_count(&self) -> usize {
        self.lock_clients().len()
    }

    /// Whether `client` is connected to this room.
    pub fn contains_client(&self, client: ClientId) -> bool {
        self.lock_clients().contains_key(&client)
    }

    /// A point-in-time copy of the client set. Broadcasts iterate this
    /// snapshot so a client disconnecting mid-broadcast can't corrupt the
    /// iteration.
    pub(crate) fn client_snapshot(&self) -> Vec<Arc<ClientSession>> {
        self.lock_clients().values().cloned().collect()
    }

    pub(crate) fn insert_client(&self, session: Arc<ClientSession>) {
        self.lock_clients().insert(session.id(), session);
    }

    /// Removes a client, returning how many remain.
    pub(crate) fn remove_client(&self, client: ClientId) -> usize {
        let mut clients = self.lock_clients();
        clients.remove(&client);
        clients.len()
    }

    /// Runs the engine's join under the room guard and sends the current
    /// view to the joining client only — the rest of the room learns
    /// nothing until the next accepted move.
    pub(crate) async fn join(&self, session: &ClientSession) {
        let (assignment, view, status) = {
            let mut engine = self.engine.lock().await;
            let assignment = engine.join(session.id());
            (assignment, engine.view(), engine.status())
        };
        tracing::info!(
            room = %self.id,
            client = %session.id(),
            ?assignment,
            "client joined room"
        );
        if let Err(error) = session.send(ServerEvent::View {
            value: view,
            state: status,
        }) {
            // Unreachable already; the next broadcast will evict them.
            tracing::debug!(room = %self.id, %error, "join view not delivered");
        }
    }

    fn lock_clients(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<ClientId, Arc<ClientSession>>>
    {
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
