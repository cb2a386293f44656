//! Storage of sessions, boards, players, tiles and territories.
//!
//! [`Repository`] is the storage interface the [`GameService`][crate::service::GameService]
//! is written against. Every entity is keyed by its generated id and supports create,
//! get, update-through-a-callback and delete, plus the relationship queries the game
//! needs. [`MemoryStore`] keeps everything in memory.

use crate::{
    board::{Board, Position, Tile},
    ids::{BoardId, MapId, PlayerId, SessionId, TerritoryId, TileId},
    session::{GameSession, Player},
    terrain::MapTerritory,
};

pub use self::{
    errors::{EntityKind, StoreError, UpdateError},
    memory::MemoryStore,
};

mod errors;
mod memory;

/// Storage interface for everything a game is made of.
///
/// Update methods hand the current value to the callback and store whatever it returns.
/// If the callback fails its error is returned as [`StoreError::Update`] and nothing
/// changes. An updated entity always keeps its id, whatever id the callback returns.
pub trait Repository {
    // Game sessions.

    /// Store a new session.
    fn session_create(&mut self, session: GameSession) -> Result<GameSession, StoreError>;

    fn session_get(&self, id: SessionId) -> Result<GameSession, StoreError>;

    fn session_update<F>(&mut self, id: SessionId, update: F) -> Result<GameSession, StoreError>
    where
        F: FnOnce(&GameSession) -> Result<GameSession, UpdateError>;

    fn session_delete(&mut self, id: SessionId) -> Result<(), StoreError>;

    /// Add an existing player to an existing session. Adding a player twice has no
    /// further effect.
    fn session_add_player(&mut self, session: SessionId, player: PlayerId)
        -> Result<(), StoreError>;

    /// The players of a session, in the order they joined.
    fn session_players(&self, id: SessionId) -> Result<Vec<Player>, StoreError>;

    /// The board a session is played on.
    fn session_board(&self, id: SessionId) -> Result<Board, StoreError>;

    // Boards.

    fn board_create(&mut self, board: Board) -> Result<(), StoreError>;

    fn board_get(&self, id: BoardId) -> Result<Board, StoreError>;

    fn board_update<F>(&mut self, id: BoardId, update: F) -> Result<Board, StoreError>
    where
        F: FnOnce(&Board) -> Result<Board, UpdateError>;

    /// Delete a board together with its tiles and the territories of its map.
    fn board_delete(&mut self, id: BoardId) -> Result<(), StoreError>;

    /// The tiles of a board, in the order they were created.
    fn board_tiles(&self, id: BoardId) -> Result<Vec<Tile>, StoreError>;

    /// The tile at a position of a board.
    fn board_tile_at(&self, board: BoardId, position: Position) -> Result<Tile, StoreError>;

    // Players.

    fn player_create(&mut self, player: Player) -> Result<(), StoreError>;

    fn player_get(&self, id: PlayerId) -> Result<Player, StoreError>;

    fn player_update<F>(&mut self, id: PlayerId, update: F) -> Result<Player, StoreError>
    where
        F: FnOnce(&Player) -> Result<Player, UpdateError>;

    /// Delete a player, remove them from every session and release the tiles they held.
    fn player_delete(&mut self, id: PlayerId) -> Result<(), StoreError>;

    /// A session the player belongs to that has not ended, preferring the most recently
    /// started one.
    fn player_active_session(&self, id: PlayerId) -> Result<Option<GameSession>, StoreError>;

    // Tiles.

    /// Store a tile on an existing board.
    fn tile_create(&mut self, tile: Tile) -> Result<(), StoreError>;

    /// Store several tiles. Stops at the first tile that cannot be stored; tiles before
    /// it remain stored.
    fn tile_create_many<I>(&mut self, tiles: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Tile>,
    {
        tiles.into_iter().try_for_each(|tile| self.tile_create(tile))
    }

    fn tile_get(&self, id: TileId) -> Result<Tile, StoreError>;

    /// Update a tile. The callback may move the tile to a free position; a tile moved
    /// within its board keeps its place in [`Repository::board_tiles`].
    fn tile_update<F>(&mut self, id: TileId, update: F) -> Result<Tile, StoreError>
    where
        F: FnOnce(&Tile) -> Result<Tile, UpdateError>;

    fn tile_delete(&mut self, id: TileId) -> Result<(), StoreError>;

    /// Every tile held by the player, on any board.
    fn tiles_by_owner(&self, owner: PlayerId) -> Result<Vec<Tile>, StoreError>;

    /// Every tile at the position, on any board.
    fn tiles_at_position(&self, position: Position) -> Result<Vec<Tile>, StoreError>;

    // Territories.

    /// Store the territories of a map. The map's board must exist.
    fn territory_create_many<I>(&mut self, territories: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = MapTerritory>;

    fn territory_get(&self, id: TerritoryId) -> Result<MapTerritory, StoreError>;

    /// The territories of a map, in the order they were created.
    fn map_territories(&self, map: MapId) -> Result<Vec<MapTerritory>, StoreError>;
}
