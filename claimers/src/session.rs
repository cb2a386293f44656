//! Players and the game sessions they take part in.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::ids::{BoardId, PlayerId, SessionId};

/// A player, identified across sessions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub gamer_name: String,
}

impl Player {
    /// Create a player with a freshly generated id.
    pub fn new(gamer_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            gamer_name: gamer_name.into(),
        }
    }
}

/// One game played on one board.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    pub board_id: BoardId,
    pub winner: Option<PlayerId>,
    pub start_time: Option<SystemTime>,
    pub end_time: Option<SystemTime>,
}

impl GameSession {
    /// Create a session on the given board that has not started yet.
    pub fn new(board_id: BoardId) -> Self {
        Self {
            id: SessionId::new(),
            board_id,
            winner: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Record the current time as the start of the session.
    pub fn start(&mut self) {
        self.start_time = Some(SystemTime::now());
    }

    /// Record the current time as the end of the session.
    pub fn end(&mut self) {
        self.end_time = Some(SystemTime::now());
    }

    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }

    /// Whether the session has started and not yet ended.
    pub fn is_active(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_none()
    }

    /// Whether the session has ended.
    pub fn is_over(&self) -> bool {
        self.end_time.is_some()
    }
}
