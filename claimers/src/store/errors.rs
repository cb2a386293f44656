//! Errors returned by [`Repository`][crate::store::Repository] implementations.

use std::{error::Error, fmt};

use thiserror::Error;
use uuid::Uuid;

use crate::{board::Position, ids::BoardId};

/// Error produced by an update callback. Passed through unchanged inside
/// [`StoreError::Update`].
pub type UpdateError = Box<dyn Error + Send + Sync>;

/// The kinds of entity kept in a repository.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EntityKind {
    Session,
    Board,
    Player,
    Tile,
    Territory,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            EntityKind::Session => "game session",
            EntityKind::Board => "board",
            EntityKind::Player => "player",
            EntityKind::Tile => "tile",
            EntityKind::Territory => "territory",
        })
    }
}

/// Error returned by repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity of the kind exists with the id.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// An entity of the kind already exists with the id.
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: EntityKind, id: Uuid },

    /// The board has no tile at the position.
    #[error("no tile at {position} on board {board}")]
    NoTileAt { board: BoardId, position: Position },

    /// Another tile already occupies the position on the board.
    #[error("position {position} on board {board} is already occupied")]
    PositionTaken { board: BoardId, position: Position },

    /// The update callback failed. The entity was left unchanged.
    #[error("update failed: {0}")]
    Update(#[source] UpdateError),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Into<Uuid>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, id: impl Into<Uuid>) -> Self {
        StoreError::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Whether this error reports a missing entity of any kind.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound { .. } | StoreError::NoTileAt { .. } => true,
            _ => false,
        }
    }
}
