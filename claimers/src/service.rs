//! Game lifecycle on top of a [`Repository`].

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    board::{Board, BoardDimensions, Grid, Position, Tile},
    ids::{PlayerId, SessionId, TileId},
    session::{GameSession, Player},
    store::{Repository, StoreError},
    terrain::{compute_modifiers, MapTerritory, TerrainModifier, TerritoryFeatures, TroopType},
};

/// Side length of the board created when no size is given.
pub const DEFAULT_BOARD_SIZE: usize = 10;

/// Error returned by [`GameService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The repository failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A board must have at least one tile per side.
    #[error("invalid board size {0}")]
    InvalidBoardSize(usize),

    /// The player is not part of the session.
    #[error("player {player} is not part of session {session}")]
    PlayerNotInSession { session: SessionId, player: PlayerId },

    /// The session has already ended.
    #[error("session {0} is over")]
    SessionOver(SessionId),

    /// The tile is held by another player.
    #[error("tile at {position} is already held by player {owner}")]
    TileOwned { position: Position, owner: PlayerId },

    /// The tile does not lie on any territory, so it has no terrain.
    #[error("tile {0} has no territory")]
    NoTerritory(TileId),
}

/// Everything created for a new game.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub session: GameSession,
    pub board: Board,
    /// The board's tiles, row by row.
    pub tiles: Vec<Tile>,
}

/// Runs games against a repository.
#[derive(Debug)]
pub struct GameService<R> {
    store: R,
}

impl<R: Repository> GameService<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Access the underlying repository.
    pub fn store(&self) -> &R {
        &self.store
    }

    /// Mutably access the underlying repository.
    pub fn store_mut(&mut self) -> &mut R {
        &mut self.store
    }

    /// Give back the underlying repository.
    pub fn into_store(self) -> R {
        self.store
    }

    /// Create a started session on a new square board of `board_size` tiles per side
    /// ([`DEFAULT_BOARD_SIZE`] if `None`). Every tile lies on temperate plains.
    pub fn new_game(&mut self, board_size: Option<usize>) -> Result<NewGame, ServiceError> {
        self.new_game_with_terrain(board_size, |_| TerritoryFeatures::default())
    }

    /// Like [`GameService::new_game`], with the terrain of each tile produced by
    /// `terrain`. Each tile gets its own territory on the board's map.
    pub fn new_game_with_terrain<F>(
        &mut self,
        board_size: Option<usize>,
        mut terrain: F,
    ) -> Result<NewGame, ServiceError>
    where
        F: FnMut(Position) -> TerritoryFeatures,
    {
        let size = board_size.unwrap_or(DEFAULT_BOARD_SIZE);
        let dimensions = BoardDimensions::try_new(size, size)
            .ok_or(ServiceError::InvalidBoardSize(size))?;
        let board = Board::new(dimensions);
        self.store.board_create(board)?;

        let mut territories = Vec::with_capacity(dimensions.total_size());
        let mut tiles = Vec::with_capacity(dimensions.total_size());
        for position in dimensions.iter_positions().flatten() {
            let territory = MapTerritory::new(board.id, terrain(position));
            let mut tile = Tile::new(board.id, position);
            tile.territory = Some(territory.id);
            territories.push(territory);
            tiles.push(tile);
        }
        self.store.territory_create_many(territories)?;
        self.store.tile_create_many(tiles.iter().cloned())?;

        let mut session = GameSession::new(board.id);
        session.start();
        let session = self.store.session_create(session)?;

        info!(session = %session.id, board = %board.id, size, "created new game");
        Ok(NewGame {
            session,
            board,
            tiles,
        })
    }

    pub fn create_player(&mut self, gamer_name: &str) -> Result<Player, ServiceError> {
        let player = Player::new(gamer_name);
        self.store.player_create(player.clone())?;
        Ok(player)
    }

    pub fn add_player_to_session(
        &mut self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<(), ServiceError> {
        Ok(self.store.session_add_player(session, player)?)
    }

    pub fn get_session(&self, id: SessionId) -> Result<GameSession, ServiceError> {
        Ok(self.store.session_get(id)?)
    }

    pub fn session_players(&self, id: SessionId) -> Result<Vec<Player>, ServiceError> {
        Ok(self.store.session_players(id)?)
    }

    /// The session's board with every tile placed at its position.
    pub fn board_grid(&self, session: SessionId) -> Result<Grid<Option<Tile>>, ServiceError> {
        let board = self.store.session_board(session)?;
        let mut grid = Grid::new(board.dimensions);
        for tile in self.store.board_tiles(board.id)? {
            if let Some(cell) = grid.get_mut(tile.position) {
                *cell = Some(tile);
            }
        }
        Ok(grid)
    }

    /// The territory under the tile at a position of the session's board.
    pub fn territory_at(
        &self,
        session: SessionId,
        position: Position,
    ) -> Result<MapTerritory, ServiceError> {
        let board = self.store.session_board(session)?;
        let tile = self.store.board_tile_at(board.id, position)?;
        let territory = tile.territory.ok_or(ServiceError::NoTerritory(tile.id))?;
        Ok(self.store.territory_get(territory)?)
    }

    /// Give the tile at `position` to `player`. The player must be part of the running
    /// session. Claiming a tile one already holds changes nothing; claiming another
    /// player's tile fails.
    pub fn claim_tile(
        &mut self,
        session: SessionId,
        player: PlayerId,
        position: Position,
    ) -> Result<Tile, ServiceError> {
        let game = self.store.session_get(session)?;
        if game.is_over() {
            return Err(ServiceError::SessionOver(session));
        }
        if !self
            .store
            .session_players(session)?
            .iter()
            .any(|member| member.id == player)
        {
            return Err(ServiceError::PlayerNotInSession { session, player });
        }

        let tile = self.store.board_tile_at(game.board_id, position)?;
        match tile.owner {
            Some(owner) if owner == player => Ok(tile),
            Some(owner) => Err(ServiceError::TileOwned { position, owner }),
            None => {
                let tile = self.store.tile_update(tile.id, |tile| {
                    Ok(Tile {
                        owner: Some(player),
                        ..tile.clone()
                    })
                })?;
                debug!(session = %session, player = %player, %position, "claimed tile");
                Ok(tile)
            }
        }
    }

    /// End the session, recording the winner if there is one.
    pub fn end_session(
        &mut self,
        session: SessionId,
        winner: Option<PlayerId>,
    ) -> Result<GameSession, ServiceError> {
        let ended = self.store.session_update(session, |current| {
            let mut ended = current.clone();
            ended.winner = winner;
            ended.end();
            Ok(ended)
        })?;
        info!(session = %session, winner = ?winner, "session ended");
        Ok(ended)
    }

    /// Movement and combat modifiers of a troop type on the territory under a tile.
    pub fn tile_modifiers(
        &self,
        troop: &TroopType,
        tile: TileId,
    ) -> Result<TerrainModifier, ServiceError> {
        let tile = self.store.tile_get(tile)?;
        let territory = tile.territory.ok_or(ServiceError::NoTerritory(tile.id))?;
        let territory = self.store.territory_get(territory)?;
        Ok(compute_modifiers(troop, &territory))
    }
}
