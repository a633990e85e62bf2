//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a Parlor server. It ties the layers
//! together: transport → protocol → session → room.

use std::sync::Arc;

use parlor_game::{tictactoe::TicTacToe, GameFactory};
use parlor_ledger::{spawn_ledger, WinLedger};
use parlor_protocol::GameKind;
use parlor_room::RoomRegistry;
use parlor_session::SessionManager;
use parlor_transport::{Transport, WebSocketTransport};

use crate::gateway::handle_connection;
use crate::ParlorError;

/// Shared server state passed to each connection handler task.
pub(crate) struct GatewayState {
    pub(crate) registry: RoomRegistry,
    pub(crate) sessions: SessionManager,
    /// Game kind used when a connection names none.
    pub(crate) default_game: GameKind,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// use parlor::prelude::*;
///
/// # async fn run() -> Result<(), ParlorError> {
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(InMemoryLedger::new())
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    factory: GameFactory,
    default_game: GameKind,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings: localhost bind, the
    /// default game factory, and tic-tac-toe as the fallback game kind.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            factory: GameFactory::default(),
            default_game: TicTacToe::game_kind(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Replaces the game factory (to register additional games).
    pub fn factory(mut self, factory: GameFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Sets the game kind used when a connection doesn't name one.
    pub fn default_game(mut self, kind: GameKind) -> Self {
        self.default_game = kind;
        self
    }

    /// Builds and binds the server, spawning the ledger task around the
    /// given storage backend.
    pub async fn build(
        self,
        ledger: impl WinLedger,
    ) -> Result<ParlorServer, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let ledger = spawn_ledger(ledger);
        let state = Arc::new(GatewayState {
            registry: RoomRegistry::new(self.factory, ledger),
            sessions: SessionManager::new(),
            default_game: self.default_game,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer {
    transport: WebSocketTransport,
    state: Arc<GatewayState>,
}

impl ParlorServer {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok((conn, request)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, request, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
