use claimers::{
    board::Position,
    catalog::Catalog,
    layout::{Canvas, TILE_MARGIN_RATIO},
    service::{GameService, ServiceError, DEFAULT_BOARD_SIZE},
    store::{MemoryStore, Repository, StoreError},
    terrain::{TerrainModifier, TerrainTag, TerrainType, TerritoryFeatures},
};

fn service() -> GameService<MemoryStore> {
    GameService::new(MemoryStore::new())
}

#[test]
fn new_game_builds_a_square_board() {
    let mut service = service();
    let game = service.new_game(Some(4)).unwrap();
    assert_eq!(game.board.size(), (4, 4));
    assert_eq!(game.tiles.len(), 16);
    assert!(game.session.is_active());
    assert_eq!(game.session.board_id, game.board.id);

    let store = service.store();
    assert_eq!(store.board_tiles(game.board.id).unwrap().len(), 16);
    assert_eq!(store.map_territories(game.board.id).unwrap().len(), 16);
    assert_eq!(store.session_get(game.session.id).unwrap(), game.session);
    for tile in &game.tiles {
        assert!(tile.owner.is_none());
        assert!(tile.territory.is_some());
    }
}

#[test]
fn new_game_defaults_to_ten_by_ten() {
    let mut service = service();
    let game = service.new_game(None).unwrap();
    assert_eq!(DEFAULT_BOARD_SIZE, 10);
    assert_eq!(game.tiles.len(), 100);
}

#[test]
fn new_game_rejects_empty_boards() {
    let mut service = service();
    assert!(matches!(
        service.new_game(Some(0)),
        Err(ServiceError::InvalidBoardSize(0))
    ));
}

#[test]
fn claiming_tiles() {
    let mut service = service();
    let game = service.new_game(Some(3)).unwrap();
    let alice = service.create_player("alice").unwrap();
    let bob = service.create_player("bob").unwrap();
    let session = game.session.id;
    let spot = Position::new(2, 1);

    assert!(matches!(
        service.claim_tile(session, alice.id, spot),
        Err(ServiceError::PlayerNotInSession { .. })
    ));

    service.add_player_to_session(session, alice.id).unwrap();
    service.add_player_to_session(session, bob.id).unwrap();
    assert_eq!(service.session_players(session).unwrap(), vec![alice.clone(), bob.clone()]);

    let claimed = service.claim_tile(session, alice.id, spot).unwrap();
    assert_eq!(claimed.owner, Some(alice.id));
    assert_eq!(claimed.position, spot);
    assert_eq!(service.claim_tile(session, alice.id, spot).unwrap(), claimed);

    match service.claim_tile(session, bob.id, spot) {
        Err(ServiceError::TileOwned { position, owner }) => {
            assert_eq!(position, spot);
            assert_eq!(owner, alice.id);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(
        service.claim_tile(session, bob.id, Position::new(3, 0)),
        Err(ServiceError::Store(StoreError::NoTileAt { .. }))
    ));

    let grid = service.board_grid(session).unwrap();
    let owners: Vec<_> = grid
        .iter()
        .filter_map(|(_, cell)| cell.as_ref().and_then(|tile| tile.owner))
        .collect();
    assert_eq!(owners, vec![alice.id]);
}

#[test]
fn tiles_of_a_deleted_player_can_be_claimed() {
    let mut service = service();
    let game = service.new_game(Some(2)).unwrap();
    let alice = service.create_player("alice").unwrap();
    let bob = service.create_player("bob").unwrap();
    let session = game.session.id;
    let spot = Position::new(1, 1);
    service.add_player_to_session(session, alice.id).unwrap();
    service.add_player_to_session(session, bob.id).unwrap();
    service.claim_tile(session, alice.id, spot).unwrap();

    service.store_mut().player_delete(alice.id).unwrap();
    assert_eq!(service.session_players(session).unwrap(), vec![bob.clone()]);

    let claimed = service.claim_tile(session, bob.id, spot).unwrap();
    assert_eq!(claimed.owner, Some(bob.id));
}

#[test]
fn ended_sessions_accept_no_claims() {
    let mut service = service();
    let game = service.new_game(Some(2)).unwrap();
    let alice = service.create_player("alice").unwrap();
    service.add_player_to_session(game.session.id, alice.id).unwrap();

    let ended = service.end_session(game.session.id, Some(alice.id)).unwrap();
    assert!(ended.is_over());
    assert!(ended.has_winner());
    assert_eq!(service.get_session(game.session.id).unwrap(), ended);
    assert_eq!(service.store().player_active_session(alice.id).unwrap(), None);

    assert!(matches!(
        service.claim_tile(game.session.id, alice.id, Position::new(0, 0)),
        Err(ServiceError::SessionOver(_))
    ));
}

#[test]
fn board_grid_places_every_tile() {
    let mut service = service();
    let game = service.new_game(Some(3)).unwrap();
    let grid = service.board_grid(game.session.id).unwrap();
    for pos in game.board.dimensions.iter_positions().flatten() {
        let tile = grid[pos].as_ref().unwrap();
        assert_eq!(tile.position, pos);
    }
}

#[test]
fn tile_modifiers_use_the_tile_territory() {
    let mut service = service();
    let game = service
        .new_game_with_terrain(Some(2), |pos| {
            if pos == Position::new(1, 0) {
                TerritoryFeatures::new(TerrainType::Snow)
                    .with_temperature(-30)
                    .with_tag(TerrainTag::Frozen)
            } else {
                TerritoryFeatures::new(TerrainType::Desert).with_temperature(40)
            }
        })
        .unwrap();
    let catalog = Catalog::builtin();
    let wizard = catalog.troop("ice wizard").unwrap();

    let snowy = game
        .tiles
        .iter()
        .find(|tile| tile.position == Position::new(1, 0))
        .unwrap();
    let territory = service.territory_at(game.session.id, snowy.position).unwrap();
    assert_eq!(territory.features.terrain_type, TerrainType::Snow);

    let on_snow = service.tile_modifiers(wizard, snowy.id).unwrap();
    let expected = TerrainModifier::new(1.2, 1.3) * TerrainModifier::new(1.1, 1.0);
    assert!((on_snow.movement - expected.movement).abs() < 1e-9);
    assert!((on_snow.combat - expected.combat).abs() < 1e-9);

    // Desert at 40 degrees: 0.7 and 0.6, less 40%.
    let sandy = &game.tiles[0];
    let in_desert = service.tile_modifiers(wizard, sandy.id).unwrap();
    assert!((in_desert.movement - 0.42).abs() < 1e-9);
    assert!((in_desert.combat - 0.36).abs() < 1e-9);
}

#[test]
fn tiles_without_territory_have_no_modifiers() {
    let mut service = service();
    let game = service.new_game(Some(1)).unwrap();
    let tile = game.tiles[0].clone();
    service
        .store_mut()
        .tile_update(tile.id, |tile| {
            let mut bare = tile.clone();
            bare.territory = None;
            Ok(bare)
        })
        .unwrap();

    let catalog = Catalog::builtin();
    let infantry = catalog.troop("Infantry").unwrap();
    assert!(matches!(
        service.tile_modifiers(infantry, tile.id),
        Err(ServiceError::NoTerritory(id)) if id == tile.id
    ));
}

#[test]
fn drawn_tiles_map_back_to_their_positions() {
    let mut service = service();
    let game = service.new_game(Some(7)).unwrap();
    let canvas = Canvas::default();
    let dim = game.board.dimensions;
    for tile in &game.tiles {
        let rect = canvas.tile_rect(&dim, tile.position).inset(TILE_MARGIN_RATIO);
        let (cx, cy) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
        assert_eq!(canvas.tile_at(&dim, cx, cy), Some(tile.position));
        assert!(rect.x + rect.width <= canvas.width);
        assert!(rect.y + rect.height <= canvas.height);
    }
    assert_eq!(canvas.tile_at(&dim, canvas.width, 0), None);
}
