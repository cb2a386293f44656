//! Identifiers for the entities of a game.
//!
//! Every entity kind gets its own newtype around a [`Uuid`] so that, for example, a
//! [`TileId`] can never be passed where a [`PlayerId`] is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying [`Uuid`].
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`GameSession`][crate::session::GameSession].
    SessionId
);
entity_id!(
    /// Identifies a [`Board`][crate::board::Board].
    BoardId
);
entity_id!(
    /// Identifies a [`Player`][crate::session::Player].
    PlayerId
);
entity_id!(
    /// Identifies a [`Tile`][crate::board::Tile].
    TileId
);
entity_id!(
    /// Identifies a [`MapTerritory`][crate::terrain::MapTerritory].
    TerritoryId
);
entity_id!(
    /// Identifies a [`TroopType`][crate::terrain::TroopType].
    TroopTypeId
);

/// Territories belong to the map laid out by a board, so a map is identified by the id
/// of its board.
pub type MapId = BoardId;
