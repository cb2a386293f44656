//! In-memory [`Repository`].

use std::collections::{hash_map::Entry, HashMap};

use tracing::debug;

use crate::{
    board::{Board, Position, Tile},
    ids::{BoardId, MapId, PlayerId, SessionId, TerritoryId, TileId},
    session::{GameSession, Player},
    store::{EntityKind, Repository, StoreError, UpdateError},
    terrain::MapTerritory,
};

/// Keeps every entity in hash maps. Lists that callers see in order (tiles of a board,
/// players of a session, territories of a map) are kept as ordered id lists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: HashMap<SessionId, GameSession>,
    /// Players of each session, in join order.
    session_players: HashMap<SessionId, Vec<PlayerId>>,
    players: HashMap<PlayerId, Player>,
    boards: HashMap<BoardId, Board>,
    /// Tiles of each board, in creation order.
    board_tiles: HashMap<BoardId, Vec<TileId>>,
    tiles: HashMap<TileId, Tile>,
    /// Which tile sits where.
    positions: HashMap<(BoardId, Position), TileId>,
    /// Territories of each map, in creation order.
    map_territories: HashMap<MapId, Vec<TerritoryId>>,
    territories: HashMap<TerritoryId, MapTerritory>,
}

impl MemoryStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_board(&self, id: BoardId) -> Result<(), StoreError> {
        if self.boards.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found(EntityKind::Board, id))
        }
    }

    fn check_session(&self, id: SessionId) -> Result<&GameSession, StoreError> {
        self.sessions
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))
    }

    /// Remove a tile from the tile map and every index.
    fn unlink_tile(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        self.positions.remove(&(tile.board_id, tile.position));
        if let Some(ids) = self.board_tiles.get_mut(&tile.board_id) {
            ids.retain(|&other| other != id);
        }
        Some(tile)
    }
}

/// Run an update callback, keeping the entity's id.
fn run_update<T, F>(current: &T, update: F, keep_id: impl FnOnce(&mut T)) -> Result<T, StoreError>
where
    F: FnOnce(&T) -> Result<T, UpdateError>,
{
    let mut updated = update(current).map_err(StoreError::Update)?;
    keep_id(&mut updated);
    Ok(updated)
}

impl Repository for MemoryStore {
    fn session_create(&mut self, session: GameSession) -> Result<GameSession, StoreError> {
        match self.sessions.entry(session.id) {
            Entry::Occupied(_) => Err(StoreError::already_exists(EntityKind::Session, session.id)),
            Entry::Vacant(entry) => {
                debug!(session = %session.id, board = %session.board_id, "created game session");
                Ok(entry.insert(session).clone())
            }
        }
    }

    fn session_get(&self, id: SessionId) -> Result<GameSession, StoreError> {
        self.check_session(id).map(Clone::clone)
    }

    fn session_update<F>(&mut self, id: SessionId, update: F) -> Result<GameSession, StoreError>
    where
        F: FnOnce(&GameSession) -> Result<GameSession, UpdateError>,
    {
        let current = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))?;
        let updated = run_update(&*current, update, |session| session.id = id)?;
        *current = updated.clone();
        debug!(session = %id, "updated game session");
        Ok(updated)
    }

    fn session_delete(&mut self, id: SessionId) -> Result<(), StoreError> {
        self.sessions
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))?;
        self.session_players.remove(&id);
        debug!(session = %id, "deleted game session");
        Ok(())
    }

    fn session_add_player(
        &mut self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<(), StoreError> {
        self.check_session(session)?;
        if !self.players.contains_key(&player) {
            return Err(StoreError::not_found(EntityKind::Player, player));
        }
        let members = self.session_players.entry(session).or_default();
        if !members.contains(&player) {
            members.push(player);
            debug!(session = %session, player = %player, "player joined session");
        }
        Ok(())
    }

    fn session_players(&self, id: SessionId) -> Result<Vec<Player>, StoreError> {
        self.check_session(id)?;
        Ok(self
            .session_players
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|player| self.players.get(player).cloned())
            .collect())
    }

    fn session_board(&self, id: SessionId) -> Result<Board, StoreError> {
        let board_id = self.check_session(id)?.board_id;
        self.board_get(board_id)
    }

    fn board_create(&mut self, board: Board) -> Result<(), StoreError> {
        match self.boards.entry(board.id) {
            Entry::Occupied(_) => Err(StoreError::already_exists(EntityKind::Board, board.id)),
            Entry::Vacant(entry) => {
                let (width, height) = board.size();
                debug!(board = %board.id, width, height, "created board");
                entry.insert(board);
                Ok(())
            }
        }
    }

    fn board_get(&self, id: BoardId) -> Result<Board, StoreError> {
        self.boards
            .get(&id)
            .copied()
            .ok_or_else(|| StoreError::not_found(EntityKind::Board, id))
    }

    fn board_update<F>(&mut self, id: BoardId, update: F) -> Result<Board, StoreError>
    where
        F: FnOnce(&Board) -> Result<Board, UpdateError>,
    {
        let current = self
            .boards
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Board, id))?;
        let updated = run_update(&*current, update, |board| board.id = id)?;
        *current = updated;
        debug!(board = %id, "updated board");
        Ok(updated)
    }

    fn board_delete(&mut self, id: BoardId) -> Result<(), StoreError> {
        self.boards
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Board, id))?;
        for tile in self.board_tiles.remove(&id).unwrap_or_default() {
            if let Some(tile) = self.tiles.remove(&tile) {
                self.positions.remove(&(id, tile.position));
            }
        }
        for territory in self.map_territories.remove(&id).unwrap_or_default() {
            self.territories.remove(&territory);
        }
        debug!(board = %id, "deleted board with its tiles and territories");
        Ok(())
    }

    fn board_tiles(&self, id: BoardId) -> Result<Vec<Tile>, StoreError> {
        self.check_board(id)?;
        Ok(self
            .board_tiles
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|tile| self.tiles.get(tile).cloned())
            .collect())
    }

    fn board_tile_at(&self, board: BoardId, position: Position) -> Result<Tile, StoreError> {
        self.check_board(board)?;
        self.positions
            .get(&(board, position))
            .and_then(|tile| self.tiles.get(tile))
            .cloned()
            .ok_or(StoreError::NoTileAt { board, position })
    }

    fn player_create(&mut self, player: Player) -> Result<(), StoreError> {
        match self.players.entry(player.id) {
            Entry::Occupied(_) => Err(StoreError::already_exists(EntityKind::Player, player.id)),
            Entry::Vacant(entry) => {
                debug!(player = %player.id, name = %player.gamer_name, "created player");
                entry.insert(player);
                Ok(())
            }
        }
    }

    fn player_get(&self, id: PlayerId) -> Result<Player, StoreError> {
        self.players
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Player, id))
    }

    fn player_update<F>(&mut self, id: PlayerId, update: F) -> Result<Player, StoreError>
    where
        F: FnOnce(&Player) -> Result<Player, UpdateError>,
    {
        let current = self
            .players
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Player, id))?;
        let updated = run_update(&*current, update, |player| player.id = id)?;
        *current = updated.clone();
        debug!(player = %id, "updated player");
        Ok(updated)
    }

    fn player_delete(&mut self, id: PlayerId) -> Result<(), StoreError> {
        self.players
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Player, id))?;
        for members in self.session_players.values_mut() {
            members.retain(|&member| member != id);
        }
        let mut released = 0usize;
        for tile in self.tiles.values_mut().filter(|tile| tile.is_owned_by(id)) {
            tile.owner = None;
            released += 1;
        }
        debug!(player = %id, released, "deleted player");
        Ok(())
    }

    fn player_active_session(&self, id: PlayerId) -> Result<Option<GameSession>, StoreError> {
        if !self.players.contains_key(&id) {
            return Err(StoreError::not_found(EntityKind::Player, id));
        }
        Ok(self
            .session_players
            .iter()
            .filter(|(_, members)| members.contains(&id))
            .filter_map(|(session, _)| self.sessions.get(session))
            .filter(|session| !session.is_over())
            // Ties on start time fall back to the id so the answer is deterministic.
            .max_by_key(|session| (session.start_time, session.id))
            .cloned())
    }

    fn tile_create(&mut self, tile: Tile) -> Result<(), StoreError> {
        self.check_board(tile.board_id)?;
        if self.tiles.contains_key(&tile.id) {
            return Err(StoreError::already_exists(EntityKind::Tile, tile.id));
        }
        let key = (tile.board_id, tile.position);
        if self.positions.contains_key(&key) {
            return Err(StoreError::PositionTaken {
                board: tile.board_id,
                position: tile.position,
            });
        }
        self.positions.insert(key, tile.id);
        self.board_tiles.entry(tile.board_id).or_default().push(tile.id);
        self.tiles.insert(tile.id, tile);
        Ok(())
    }

    fn tile_create_many<I>(&mut self, tiles: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Tile>,
    {
        let mut count = 0usize;
        for tile in tiles {
            self.tile_create(tile)?;
            count += 1;
        }
        debug!(count, "created tiles");
        Ok(())
    }

    fn tile_get(&self, id: TileId) -> Result<Tile, StoreError> {
        self.tiles
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Tile, id))
    }

    fn tile_update<F>(&mut self, id: TileId, update: F) -> Result<Tile, StoreError>
    where
        F: FnOnce(&Tile) -> Result<Tile, UpdateError>,
    {
        let current = self
            .tiles
            .get(&id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Tile, id))?;
        let updated = run_update(current, update, |tile| tile.id = id)?;

        let from = (current.board_id, current.position);
        let to = (updated.board_id, updated.position);
        if from != to {
            self.check_board(updated.board_id)?;
            if self.positions.contains_key(&to) {
                return Err(StoreError::PositionTaken {
                    board: updated.board_id,
                    position: updated.position,
                });
            }
            self.positions.remove(&from);
            self.positions.insert(to, id);
            // A tile keeps its place in its board's order unless it changes board.
            if from.0 != to.0 {
                if let Some(ids) = self.board_tiles.get_mut(&from.0) {
                    ids.retain(|&other| other != id);
                }
                self.board_tiles.entry(to.0).or_default().push(id);
            }
        }
        self.tiles.insert(id, updated.clone());
        debug!(tile = %id, owner = ?updated.owner, units = updated.units, "updated tile");
        Ok(updated)
    }

    fn tile_delete(&mut self, id: TileId) -> Result<(), StoreError> {
        self.unlink_tile(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Tile, id))?;
        debug!(tile = %id, "deleted tile");
        Ok(())
    }

    fn tiles_by_owner(&self, owner: PlayerId) -> Result<Vec<Tile>, StoreError> {
        let mut tiles: Vec<_> = self
            .tiles
            .values()
            .filter(|tile| tile.is_owned_by(owner))
            .cloned()
            .collect();
        tiles.sort_by_key(|tile| (tile.board_id, tile.position));
        Ok(tiles)
    }

    fn tiles_at_position(&self, position: Position) -> Result<Vec<Tile>, StoreError> {
        let mut tiles: Vec<_> = self
            .tiles
            .values()
            .filter(|tile| tile.position == position)
            .cloned()
            .collect();
        tiles.sort_by_key(|tile| tile.board_id);
        Ok(tiles)
    }

    fn territory_create_many<I>(&mut self, territories: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = MapTerritory>,
    {
        let mut count = 0usize;
        for territory in territories {
            self.check_board(territory.map_id)?;
            match self.territories.entry(territory.id) {
                Entry::Occupied(_) => {
                    return Err(StoreError::already_exists(
                        EntityKind::Territory,
                        territory.id,
                    ))
                }
                Entry::Vacant(entry) => {
                    self.map_territories
                        .entry(territory.map_id)
                        .or_default()
                        .push(territory.id);
                    entry.insert(territory);
                    count += 1;
                }
            }
        }
        debug!(count, "created territories");
        Ok(())
    }

    fn territory_get(&self, id: TerritoryId) -> Result<MapTerritory, StoreError> {
        self.territories
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Territory, id))
    }

    fn map_territories(&self, map: MapId) -> Result<Vec<MapTerritory>, StoreError> {
        self.check_board(map)?;
        Ok(self
            .map_territories
            .get(&map)
            .into_iter()
            .flatten()
            .filter_map(|territory| self.territories.get(territory).cloned())
            .collect())
    }
}
