//! The game factory: maps a [`GameKind`] to a fresh engine instance.
//!
//! Adding a game to a server means implementing [`Game`](crate::Game) and
//! registering a constructor here — the room layer never changes.

use std::collections::HashMap;

use parlor_protocol::GameKind;

use crate::{tictactoe::TicTacToe, Game};

/// A constructor for one game kind.
pub type GameConstructor = fn() -> Box<dyn Game>;

/// Registry of game constructors, keyed by kind.
pub struct GameFactory {
    games: HashMap<GameKind, GameConstructor>,
}

impl GameFactory {
    /// Creates an empty factory with no games registered.
    pub fn empty() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// Registers a constructor for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: GameKind, constructor: GameConstructor) {
        self.games.insert(kind, constructor);
    }

    /// Builds a fresh engine for `kind`, or `None` if the kind is unknown.
    pub fn create(&self, kind: &GameKind) -> Option<Box<dyn Game>> {
        self.games.get(kind).map(|constructor| constructor())
    }

    /// Whether a constructor is registered for `kind`.
    pub fn contains(&self, kind: &GameKind) -> bool {
        self.games.contains_key(kind)
    }

    /// The kinds this factory can build.
    pub fn kinds(&self) -> Vec<GameKind> {
        self.games.keys().cloned().collect()
    }
}

/// The default factory ships the reference grid game.
impl Default for GameFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register(TicTacToe::game_kind(), || {
            Box::new(TicTacToe::new())
        });
        factory
    }
}
