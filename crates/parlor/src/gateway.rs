//! Per-connection gateway: parameter validation, join, and the read loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Derive game kind and room id from the upgrade request
//!   2. Quickplay probe, or join/create the requested room
//!   3. Loop: forward each text frame to the registry's dispatch
//!   4. On any exit — close frame, error, panic — leave the room and
//!      drop the session

use std::sync::Arc;

use parlor_protocol::{
    ClientId, GameKind, ProtocolError, RoomId, ServerEvent,
};
use parlor_session::ClientSession;
use parlor_transport::{ConnectRequest, Connection, WebSocketConnection};

use crate::server::GatewayState;
use crate::ParlorError;

/// Drop guard that removes a client from its room and from the session
/// registry when the handler exits, however it exits. `leave` is a no-op
/// for clients that never joined (e.g. quickplay probes), so the guard is
/// unconditional.
struct SessionGuard {
    session: Arc<ClientSession>,
    state: Arc<GatewayState>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.registry.leave(&self.session);
        self.state.sessions.remove(self.session.id());
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    request: ConnectRequest,
    state: Arc<GatewayState>,
) -> Result<(), ParlorError> {
    // Game kind: explicit query param, else the first path segment
    // (frontends connect to /<game>/...), else the configured default.
    let game_kind = request
        .param("game")
        .filter(|value| !value.trim().is_empty())
        .map(GameKind::new)
        .or_else(|| request.path_segment(0).map(GameKind::new))
        .unwrap_or_else(|| state.default_game.clone());

    let quick_play = request
        .param("quickPlayJoin")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let client_id = ClientId::new();
    let (session, mut outbound) = ClientSession::new(client_id);
    let session = Arc::new(session);
    state.sessions.register(Arc::clone(&session));
    let _guard = SessionGuard {
        session: Arc::clone(&session),
        state: Arc::clone(&state),
    };

    tracing::info!(
        conn = %conn.id(),
        client = %client_id,
        game = %game_kind,
        quick_play,
        "connection established"
    );

    // Writer task: drains the session's outbound channel onto the socket.
    // It ends when every sender is gone (session dropped from all rooms
    // and registries) or the socket dies.
    let writer_conn = conn.clone();
    tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    tracing::error!(
                        %error,
                        "failed to encode outbound event"
                    );
                    continue;
                }
            };
            if writer_conn.send(&text).await.is_err() {
                break;
            }
        }
    });

    if quick_play {
        // Resolve a room and report it; the client reconnects to the
        // matched room on a fresh socket, so no join happens here.
        match state.registry.quick_play().await {
            Some((room_id, game_kind)) => {
                tracing::info!(
                    client = %client_id,
                    room = %room_id,
                    "quickplay matched"
                );
                send_event(
                    &conn,
                    &ServerEvent::QuickPlayJoined { room_id, game_kind },
                )
                .await?;
            }
            None => {
                send_event(&conn, &ServerEvent::NoFree).await?;
            }
        }
    } else {
        let room_id = request
            .param("roomID")
            .and_then(|raw| raw.parse::<RoomId>().ok());
        let Some(room_id) = room_id else {
            send_event(
                &conn,
                &ServerEvent::Error {
                    message: "Missing or invalid roomID".into(),
                },
            )
            .await?;
            let _ = conn.close().await;
            return Ok(());
        };

        if let Err(error) = state
            .registry
            .join_or_create(room_id, game_kind, &session)
            .await
        {
            send_event(
                &conn,
                &ServerEvent::Error {
                    message: error.to_string(),
                },
            )
            .await?;
            let _ = conn.close().await;
            return Ok(());
        }
    }

    // Read loop: every complete text frame goes to dispatch; the
    // connection ends on a close frame, EOF, or a transport error.
    loop {
        match conn.recv().await {
            Ok(Some(text)) => {
                state.registry.dispatch(&session, &text).await;
            }
            Ok(None) => {
                tracing::info!(client = %client_id, "connection closed");
                break;
            }
            Err(error) => {
                tracing::debug!(
                    client = %client_id,
                    %error,
                    "connection error"
                );
                break;
            }
        }
    }

    let _ = conn.close().await;
    Ok(())
    // _guard drops here → leave + session removal.
}

/// Serializes and sends one event directly on the socket (used before the
/// client is in any room; room traffic goes through the writer task).
async fn send_event(
    conn: &WebSocketConnection,
    event: &ServerEvent,
) -> Result<(), ParlorError> {
    let text = serde_json::to_string(event)
        .map_err(|e| ParlorError::Protocol(ProtocolError::Encode(e)))?;
    conn.send(&text).await.map_err(ParlorError::Transport)
}
