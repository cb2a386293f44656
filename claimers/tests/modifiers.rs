use proptest::prelude::*;

use claimers::{
    ids::BoardId,
    terrain::{
        compute_modifiers, elevation_factor, temperature_penalty, MapTerritory, MovementType,
        TemperatureRange, TerrainModifier, TerrainTag, TerrainType, TerritoryFeatures,
        TroopType,
    },
};

const EPSILON: f64 = 1e-9;

fn assert_close(actual: TerrainModifier, movement: f64, combat: f64) {
    assert!(
        (actual.movement - movement).abs() < EPSILON && (actual.combat - combat).abs() < EPSILON,
        "expected {{ movement: {}, combat: {} }}, got {:?}",
        movement,
        combat,
        actual
    );
}

fn territory(features: TerritoryFeatures) -> MapTerritory {
    MapTerritory::new(BoardId::new(), features)
}

fn ice_wizard() -> TroopType {
    TroopType::new(
        "Ice Wizard",
        MovementType::Ground,
        TemperatureRange::new(-50, 0),
    )
    .with_modifier(TerrainType::Snow, TerrainModifier::new(1.2, 1.3))
}

fn snow_at(temperature: i32) -> MapTerritory {
    territory(TerritoryFeatures::new(TerrainType::Snow).with_temperature(temperature))
}

#[test]
fn ice_wizard_in_preferred_range_gets_terrain_factor_only() {
    let result = compute_modifiers(&ice_wizard(), &snow_at(-30));
    assert_eq!(result, TerrainModifier::new(1.2, 1.3));
}

#[test]
fn ice_wizard_below_preferred_range_is_penalized() {
    // -80 lies 30 degrees below the preferred minimum of -50.
    let result = compute_modifiers(&ice_wizard(), &snow_at(-80));
    assert_close(result, 1.2 * 0.7, 1.3 * 0.7);
    assert_close(result, 0.84, 0.91);
}

#[test]
fn ice_wizard_in_hot_snow_loses_forty_percent() {
    let result = compute_modifiers(&ice_wizard(), &snow_at(40));
    assert_close(result, 0.72, 0.78);
}

#[test]
fn temperature_penalty_never_exceeds_half() {
    let troop = TroopType::new("Test", MovementType::Ground, TemperatureRange::new(0, 10));
    let result = compute_modifiers(
        &troop,
        &territory(TerritoryFeatures::default().with_temperature(200)),
    );
    assert_eq!(result, TerrainModifier::new(0.5, 0.5));
}

#[test]
fn empty_table_in_range_is_neutral() {
    let troop = TroopType::new("Test", MovementType::Ground, TemperatureRange::new(-10, 10));
    let features = TerritoryFeatures::new(TerrainType::Forest)
        .with_tags(vec![TerrainTag::Forested, TerrainTag::Riverside]);
    assert_eq!(
        compute_modifiers(&troop, &territory(features)),
        TerrainModifier::NEUTRAL
    );
}

#[test]
fn ground_troops_slow_down_only_above_fifty() {
    let troop = TroopType::new("Test", MovementType::Ground, TemperatureRange::new(-10, 10));
    let at_fifty = compute_modifiers(
        &troop,
        &territory(TerritoryFeatures::new(TerrainType::Hills).with_elevation(50)),
    );
    let at_fifty_one = compute_modifiers(
        &troop,
        &territory(TerritoryFeatures::new(TerrainType::Hills).with_elevation(51)),
    );
    assert_eq!(at_fifty, TerrainModifier::NEUTRAL);
    assert_eq!(at_fifty_one, TerrainModifier::new(0.8, 1.0));
}

#[test]
fn duplicate_tags_apply_twice() {
    let troop = TroopType::new("Test", MovementType::Ground, TemperatureRange::new(-10, 10))
        .with_modifier(TerrainTag::Rocky, TerrainModifier::new(0.5, 2.0));
    let features = TerritoryFeatures::new(TerrainType::Mountains)
        .with_tag(TerrainTag::Rocky)
        .with_tag(TerrainTag::Rocky);
    assert_eq!(
        compute_modifiers(&troop, &territory(features)),
        TerrainModifier::new(0.25, 4.0)
    );
}

#[test]
fn terrain_tags_and_elevation_compose() {
    let troop = TroopType::new("Test", MovementType::Ground, TemperatureRange::new(-20, 20))
        .with_modifier(TerrainType::Mountains, TerrainModifier::new(0.5, 1.5))
        .with_modifier(TerrainTag::Rocky, TerrainModifier::new(0.5, 1.0))
        .with_modifier(TerrainTag::Frozen, TerrainModifier::new(1.0, 0.5));
    let features = TerritoryFeatures::new(TerrainType::Mountains)
        .with_elevation(80)
        .with_temperature(-30)
        .with_tags(vec![TerrainTag::Rocky, TerrainTag::Frozen]);
    // 0.5 * 0.5 * 1.0 * 0.8 and 1.5 * 1.0 * 0.5, then 10 degrees out of range.
    assert_close(
        compute_modifiers(&troop, &territory(features)),
        0.2 * 0.9,
        0.75 * 0.9,
    );
}

#[test]
fn computing_does_not_modify_inputs() {
    let troop = ice_wizard();
    let land = snow_at(-80);
    let (troop_before, land_before) = (troop.clone(), land.clone());
    compute_modifiers(&troop, &land);
    assert_eq!(troop, troop_before);
    assert_eq!(land, land_before);
}

fn movement_type() -> impl Strategy<Value = MovementType> {
    prop::sample::select(MovementType::ALL.to_vec())
}

fn terrain_type() -> impl Strategy<Value = TerrainType> {
    prop::sample::select(TerrainType::ALL.to_vec())
}

fn terrain_tags() -> impl Strategy<Value = Vec<TerrainTag>> {
    prop::collection::vec(prop::sample::select(TerrainTag::ALL.to_vec()), 0..5)
}

fn modifier() -> impl Strategy<Value = TerrainModifier> {
    (0.0f64..3.0, 0.0f64..3.0).prop_map(|(movement, combat)| TerrainModifier::new(movement, combat))
}

/// A troop with a random entry for every terrain type and tag.
fn troop() -> impl Strategy<Value = TroopType> {
    (
        movement_type(),
        -100i32..=100,
        0i32..=100,
        prop::collection::vec(modifier(), TerrainType::ALL.len()),
        prop::collection::vec(modifier(), TerrainTag::ALL.len()),
    )
        .prop_map(|(movement_type, min, width, terrain, tags)| {
            let mut troop = TroopType::new(
                "Generated",
                movement_type,
                TemperatureRange::new(min, min + width),
            );
            for (&key, modifier) in TerrainType::ALL.iter().zip(terrain) {
                troop = troop.with_modifier(key, modifier);
            }
            for (&key, modifier) in TerrainTag::ALL.iter().zip(tags) {
                troop = troop.with_modifier(key, modifier);
            }
            troop
        })
}

fn features() -> impl Strategy<Value = TerritoryFeatures> {
    (terrain_type(), -150i32..=150, -100i32..=200, terrain_tags()).prop_map(
        |(terrain, temperature, elevation, tags)| {
            TerritoryFeatures::new(terrain)
                .with_temperature(temperature)
                .with_elevation(elevation)
                .with_tags(tags)
        },
    )
}

fn relatively_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn penalty_is_monotone_and_capped(a in 0u32..1000, b in 0u32..1000) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(temperature_penalty(near) <= temperature_penalty(far));
        prop_assert!(temperature_penalty(far) <= 0.5);
        prop_assert!(temperature_penalty(near) >= 0.0);
    }

    #[test]
    fn in_range_temperature_costs_nothing(min in -100i32..=100, width in 0i32..=100, offset in 0i32..=100) {
        let range = TemperatureRange::new(min, min + width);
        prop_assert_eq!(range.distance(min + offset.min(width)), 0);
    }

    #[test]
    fn results_stay_valid(troop in troop(), features in features()) {
        let result = compute_modifiers(&troop, &territory(features));
        prop_assert!(result.is_valid());
    }

    #[test]
    fn tag_order_does_not_matter(troop in troop(), features in features()) {
        let mut reversed = features.clone();
        reversed.tags.reverse();
        let forward = compute_modifiers(&troop, &territory(features));
        let backward = compute_modifiers(&troop, &territory(reversed));
        prop_assert!(relatively_close(forward.movement, backward.movement));
        prop_assert!(relatively_close(forward.combat, backward.combat));
    }

    #[test]
    fn only_ground_troops_feel_elevation(movement_type in movement_type(), elevation in -100i32..=200) {
        let factor = elevation_factor(movement_type, elevation);
        if movement_type == MovementType::Ground && elevation > 50 {
            prop_assert_eq!(factor, 0.8);
        } else {
            prop_assert_eq!(factor, 1.0);
        }
    }

    #[test]
    fn elevation_never_changes_combat(troop in troop(), features in features(), elevation in -100i32..=200) {
        let low = compute_modifiers(&troop, &territory(features.clone().with_elevation(0)));
        let high = compute_modifiers(&troop, &territory(features.with_elevation(elevation)));
        prop_assert_eq!(low.combat, high.combat);
    }

    #[test]
    fn temperature_scales_both_fields_equally(troop in troop(), features in features()) {
        let preferred = troop.temperature_preference.min;
        let comfortable = compute_modifiers(
            &troop,
            &territory(features.clone().with_temperature(preferred)),
        );
        let actual = compute_modifiers(&troop, &territory(features.clone()));
        let penalty = temperature_penalty(troop.temperature_preference.distance(features.temperature));
        prop_assert!(relatively_close(actual.movement, comfortable.movement * (1.0 - penalty)));
        prop_assert!(relatively_close(actual.combat, comfortable.combat * (1.0 - penalty)));
    }
}
