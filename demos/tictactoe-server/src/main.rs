//! A complete tic-tac-toe server: the default game factory, an in-memory
//! win ledger, and the WebSocket gateway.
//!
//! Connect with `ws://host:8080/?roomID=<uuid>` (any UUID creates the
//! room), or probe matchmaking with `ws://host:8080/?quickPlayJoin=true`.

use parlor::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = ParlorServer::builder()
        .bind("0.0.0.0:8080")
        .build(InMemoryLedger::new())
        .await?;
    tracing::info!(addr = %server.local_addr()?, "tic-tac-toe server up");

    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    //! End-to-end games over real sockets: two browsers' worth of traffic,
    //! minus the browsers.

    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use parlor::prelude::*;
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start() -> String {
        let server = ParlorServer::builder()
            .bind("127.0.0.1:0")
            .build(InMemoryLedger::new())
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        addr
    }

    async fn connect(addr: &str, query: &str) -> Ws {
        let (ws, _) = tokio_tungstenite::connect_async(format!(
            "ws://{addr}/tictactoe?{query}"
        ))
        .await
        .unwrap();
        ws
    }

    async fn recv_event(ws: &mut Ws) -> ServerEvent {
        loop {
            let msg =
                tokio::time::timeout(Duration::from_secs(5), ws.next())
                    .await
                    .expect("timed out waiting for event")
                    .expect("stream ended")
                    .expect("transport error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).unwrap();
                }
                _ => continue,
            }
        }
    }

    async fn send_text(ws: &mut Ws, text: &str) {
        ws.send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    async fn send_move(ws: &mut Ws, row: usize, col: usize) {
        send_text(
            ws,
            &format!(r#"{{"event":"move","row":{row},"col":{col}}}"#),
        )
        .await;
    }

    /// Expects the next event to be a view and returns (board, state).
    async fn expect_view(
        ws: &mut Ws,
    ) -> (serde_json::Value, GameStatus) {
        match recv_event(ws).await {
            ServerEvent::View { value, state } => {
                (value["board"].clone(), state)
            }
            other => panic!("expected view, got {other:?}"),
        }
    }

    /// Two players in one fresh room, both past their initial view.
    async fn setup_game(addr: &str) -> (Ws, Ws) {
        let room_id = RoomId::new();
        let mut a = connect(addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut a).await;
        let mut b = connect(addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut b).await;
        (a, b)
    }

    /// Sends a move and drains the resulting view broadcast from both
    /// players, returning the sender's copy.
    async fn play(
        sender: &mut Ws,
        other: &mut Ws,
        row: usize,
        col: usize,
    ) -> (serde_json::Value, GameStatus) {
        send_move(sender, row, col).await;
        let seen = expect_view(sender).await;
        let _ = expect_view(other).await;
        seen
    }

    #[tokio::test]
    async fn test_single_move_reaches_both_players() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        send_move(&mut a, 0, 0).await;
        let (board, state) = expect_view(&mut a).await;
        assert_eq!(state, GameStatus::Playing);
        assert_eq!(board[0][0], 1);

        let (board, _) = expect_view(&mut b).await;
        assert_eq!(board[0][0], 1);
    }

    // ---------------------------------------------------------------
    // Full game: A wins with the top row
    //  A | A | A
    //  B | B | .
    //  . | . | .
    // ---------------------------------------------------------------
    #[tokio::test]
    async fn test_a_wins_top_row() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        play(&mut a, &mut b, 0, 0).await;
        play(&mut b, &mut a, 1, 0).await;
        play(&mut a, &mut b, 0, 1).await;
        play(&mut b, &mut a, 1, 1).await;

        let (board, state) = play(&mut a, &mut b, 0, 2).await;
        assert_eq!(state, GameStatus::Win);
        assert_eq!(board[0], serde_json::json!([1, 1, 1]));
    }

    // ---------------------------------------------------------------
    // Draw game
    //  A | B | A
    //  A | B | A
    //  B | A | B
    // ---------------------------------------------------------------
    #[tokio::test]
    async fn test_draw() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        play(&mut a, &mut b, 0, 0).await;
        play(&mut b, &mut a, 0, 1).await;
        play(&mut a, &mut b, 0, 2).await;
        play(&mut b, &mut a, 1, 1).await;
        play(&mut a, &mut b, 1, 0).await;
        play(&mut b, &mut a, 2, 0).await;
        play(&mut a, &mut b, 1, 2).await;
        play(&mut b, &mut a, 2, 2).await;

        let (_, state) = play(&mut a, &mut b, 2, 1).await;
        assert_eq!(state, GameStatus::Draw);
    }

    // ---------------------------------------------------------------
    // Wrong turn: B tries to go first. Rule violations produce no
    // broadcast at all, so we verify by confirming A's later move still
    // lands on an untouched board.
    // ---------------------------------------------------------------
    #[tokio::test]
    async fn test_wrong_turn_is_silently_refused() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        send_move(&mut b, 0, 0).await;

        send_move(&mut a, 0, 0).await;
        let (board, _) = expect_view(&mut a).await;
        assert_eq!(board[0][0], 1); // A's mark, not B's
        let _ = expect_view(&mut b).await;
    }

    #[tokio::test]
    async fn test_chat_is_relayed_with_seat_tags() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        send_text(&mut b, r#"{"event":"chat","text":"glhf"}"#).await;

        for ws in [&mut a, &mut b] {
            match recv_event(ws).await {
                ServerEvent::Chat { chat, from } => {
                    assert_eq!(chat, "glhf");
                    assert_eq!(from, ChatFrom::Seat(1));
                }
                other => panic!("expected chat, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_observer_sees_broadcasts_but_cannot_move() {
        let addr = start().await;
        let room_id = RoomId::new();
        let mut a = connect(&addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut a).await;
        let mut b = connect(&addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut b).await;
        let mut spectator =
            connect(&addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut spectator).await;

        // The spectator's move is refused without a trace.
        send_move(&mut spectator, 0, 0).await;

        // A's move reaches all three.
        send_move(&mut a, 0, 0).await;
        let (board, _) = expect_view(&mut spectator).await;
        assert_eq!(board[0][0], 1);
        let _ = expect_view(&mut a).await;
        let _ = expect_view(&mut b).await;
    }

    #[tokio::test]
    async fn test_lock_hides_the_room_from_quickplay() {
        let addr = start().await;
        let room_id = RoomId::new();
        let mut host = connect(&addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut host).await;

        send_text(&mut host, r#"{"event":"room.lock","locked":true}"#)
            .await;
        assert_eq!(
            recv_event(&mut host).await,
            ServerEvent::RoomLocked { locked: true }
        );

        let mut probe = connect(&addr, "quickPlayJoin=true").await;
        assert_eq!(recv_event(&mut probe).await, ServerEvent::NoFree);

        send_text(&mut host, r#"{"event":"room.lock","locked":false}"#)
            .await;
        assert_eq!(
            recv_event(&mut host).await,
            ServerEvent::RoomLocked { locked: false }
        );

        let mut probe = connect(&addr, "quickPlayJoin=true").await;
        assert!(matches!(
            recv_event(&mut probe).await,
            ServerEvent::QuickPlayJoined { room_id: matched, .. }
                if matched == room_id
        ));
    }

    #[tokio::test]
    async fn test_quickplay_redirect_flow() {
        // The probe learns where to go, reconnects there, and plays.
        let addr = start().await;
        let room_id = RoomId::new();
        let mut host = connect(&addr, &format!("roomID={room_id}")).await;
        let _ = expect_view(&mut host).await;

        let mut probe = connect(&addr, "quickPlayJoin=true").await;
        let (matched, game_kind) = match recv_event(&mut probe).await {
            ServerEvent::QuickPlayJoined { room_id, game_kind } => {
                (room_id, game_kind)
            }
            other => panic!("expected quickPlayJoined, got {other:?}"),
        };
        assert_eq!(matched, room_id);
        probe.close(None).await.unwrap();

        let mut joiner = connect(
            &addr,
            &format!("roomID={matched}&game={game_kind}"),
        )
        .await;
        let _ = expect_view(&mut joiner).await;

        // The reconnected client holds seat 1 and can answer A's move.
        send_move(&mut host, 0, 0).await;
        let _ = expect_view(&mut host).await;
        let _ = expect_view(&mut joiner).await;
        send_move(&mut joiner, 1, 1).await;
        let (board, _) = expect_view(&mut joiner).await;
        assert_eq!(board[1][1], 2);
    }

    #[tokio::test]
    async fn test_malformed_frames_do_not_kill_the_connection() {
        let addr = start().await;
        let (mut a, mut b) = setup_game(&addr).await;

        send_text(&mut a, "not json at all").await;
        send_text(&mut a, r#"{"event":"move"}"#).await;
        send_text(&mut a, r#"{"event":"warp","to":"moon"}"#).await;

        // The connection is still alive and the room unharmed.
        send_move(&mut a, 2, 2).await;
        let (board, state) = expect_view(&mut a).await;
        assert_eq!(state, GameStatus::Playing);
        assert_eq!(board[2][2], 1);
        let _ = expect_view(&mut b).await;
    }
}
