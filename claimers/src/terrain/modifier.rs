//! The terrain modifier engine.

use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::terrain::{MapTerritory, MovementType, TerrainKey, TerritoryFeatures, TroopType};

/// Elevations strictly above this count as high ground.
pub const HIGH_ELEVATION: i32 = 50;
/// Movement multiplier for ground troops on high ground.
pub const GROUND_HIGH_ELEVATION_FACTOR: f64 = 0.8;
/// Largest fraction of movement and combat lost to temperature.
pub const MAX_TEMPERATURE_PENALTY: f64 = 0.5;
/// Degrees outside the preferred range that cost the whole of a troop's effectiveness,
/// before the cap applies.
const TEMPERATURE_PENALTY_SCALE: f64 = 100.0;

/// Multipliers for a troop's movement speed and combat strength.
///
/// 0.0 means impassable or powerless, 1.0 unaffected and anything above 1.0 faster or
/// stronger. Modifiers combine by multiplication.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainModifier {
    pub movement: f64,
    pub combat: f64,
}

impl TerrainModifier {
    /// The modifier that changes nothing.
    pub const NEUTRAL: TerrainModifier = TerrainModifier {
        movement: 1.0,
        combat: 1.0,
    };

    pub fn new(movement: f64, combat: f64) -> Self {
        Self { movement, combat }
    }

    /// Scale both multipliers by the same factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            movement: self.movement * factor,
            combat: self.combat * factor,
        }
    }

    /// Whether both multipliers are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.movement.is_finite()
            && self.combat.is_finite()
            && self.movement >= 0.0
            && self.combat >= 0.0
    }
}

impl Default for TerrainModifier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Mul for TerrainModifier {
    type Output = TerrainModifier;

    fn mul(self, rhs: TerrainModifier) -> TerrainModifier {
        TerrainModifier {
            movement: self.movement * rhs.movement,
            combat: self.combat * rhs.combat,
        }
    }
}

impl MulAssign for TerrainModifier {
    fn mul_assign(&mut self, rhs: TerrainModifier) {
        *self = *self * rhs;
    }
}

/// Compute the movement and combat modifiers of a troop type on a territory.
///
/// Starting from [`TerrainModifier::NEUTRAL`], the following factors are multiplied in,
/// always in this order:
///
/// 1. the troop's entry for the territory's primary terrain type,
/// 2. the troop's entry for each tag of the territory, once per occurrence and in the
///    order the tags are listed,
/// 3. the elevation factor (movement only, see [`elevation_factor`]),
/// 4. one minus the temperature penalty (see [`temperature_penalty`]).
///
/// Terrain types and tags missing from the troop's table contribute nothing, so this
/// never fails. Neither argument is modified.
pub fn compute_modifiers(troop: &TroopType, territory: &MapTerritory) -> TerrainModifier {
    let result = modifiers_on_features(troop, &territory.features);
    trace!(
        troop = %troop.name,
        territory = %territory.id,
        movement = result.movement,
        combat = result.combat,
        "computed terrain modifiers"
    );
    result
}

pub(super) fn modifiers_on_features(
    troop: &TroopType,
    features: &TerritoryFeatures,
) -> TerrainModifier {
    let mut result = TerrainModifier::NEUTRAL;

    if let Some(&terrain) = troop.modifier_for(TerrainKey::Terrain(features.terrain_type)) {
        result *= terrain;
    }
    for &tag in &features.tags {
        if let Some(&tagged) = troop.modifier_for(TerrainKey::Tag(tag)) {
            result *= tagged;
        }
    }

    result.movement *= elevation_factor(troop.movement_type, features.elevation);

    let distance = troop.temperature_preference.distance(features.temperature);
    result.scaled(1.0 - temperature_penalty(distance))
}

/// Movement multiplier for a troop of the given movement type at the given elevation.
pub fn elevation_factor(movement_type: MovementType, elevation: i32) -> f64 {
    if elevation <= HIGH_ELEVATION {
        return 1.0;
    }
    match movement_type {
        MovementType::Ground => GROUND_HIGH_ELEVATION_FACTOR,
        // Left unchanged at altitude. This is not a bonus.
        MovementType::Flying => 1.0,
        MovementType::Aquatic | MovementType::Amphibious => 1.0,
    }
}

/// Fraction of effectiveness lost when the temperature lies `distance` degrees outside a
/// troop's preferred range. Grows by 0.01 per degree up to [`MAX_TEMPERATURE_PENALTY`].
pub fn temperature_penalty(distance: u32) -> f64 {
    (f64::from(distance) / TEMPERATURE_PENALTY_SCALE).min(MAX_TEMPERATURE_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::BoardId,
        terrain::{TemperatureRange, TerrainTag, TerrainType},
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn plain_troop(movement_type: MovementType) -> TroopType {
        TroopType::new("Test", movement_type, TemperatureRange::new(-100, 100))
    }

    #[test]
    fn neutral_without_any_entries() {
        let troop = plain_troop(MovementType::Ground);
        let territory = MapTerritory::new(
            BoardId::new(),
            TerritoryFeatures::new(TerrainType::Swamp).with_tag(TerrainTag::Marshy),
        );
        assert_eq!(compute_modifiers(&troop, &territory), TerrainModifier::NEUTRAL);
    }

    #[test]
    fn primary_terrain_applies_to_both_fields() {
        let troop = plain_troop(MovementType::Ground)
            .with_modifier(TerrainType::Forest, TerrainModifier::new(0.5, 1.5));
        let features = TerritoryFeatures::new(TerrainType::Forest);
        assert_eq!(troop.modifiers_on(&features), TerrainModifier::new(0.5, 1.5));
    }

    #[test]
    fn tag_entries_do_not_match_terrain_type() {
        // "forested" the tag is unrelated to "forest" the terrain type.
        let troop = plain_troop(MovementType::Ground)
            .with_modifier(TerrainTag::Forested, TerrainModifier::new(0.5, 0.5));
        let features = TerritoryFeatures::new(TerrainType::Forest);
        assert_eq!(troop.modifiers_on(&features), TerrainModifier::NEUTRAL);
    }

    #[test]
    fn elevation_only_touches_ground_movement() {
        assert_eq!(elevation_factor(MovementType::Ground, 50), 1.0);
        assert_eq!(elevation_factor(MovementType::Ground, 51), 0.8);
        for &movement_type in &[
            MovementType::Flying,
            MovementType::Aquatic,
            MovementType::Amphibious,
        ] {
            assert_eq!(elevation_factor(movement_type, 51), 1.0);
            assert_eq!(elevation_factor(movement_type, i32::MAX), 1.0);
        }

        let troop = plain_troop(MovementType::Ground);
        let high = TerritoryFeatures::new(TerrainType::Mountains).with_elevation(90);
        assert_eq!(troop.modifiers_on(&high), TerrainModifier::new(0.8, 1.0));
    }

    #[test]
    fn temperature_penalty_is_capped() {
        assert_eq!(temperature_penalty(0), 0.0);
        assert!(close(temperature_penalty(25), 0.25));
        assert_eq!(temperature_penalty(50), 0.5);
        assert_eq!(temperature_penalty(190), 0.5);
        assert_eq!(temperature_penalty(u32::MAX), 0.5);
    }

    #[test]
    fn zero_modifier_makes_terrain_impassable() {
        let troop = plain_troop(MovementType::Aquatic)
            .with_modifier(TerrainType::Desert, TerrainModifier::new(0.0, 0.0));
        let features = TerritoryFeatures::new(TerrainType::Desert)
            .with_temperature(100)
            .with_elevation(80);
        let result = troop.modifiers_on(&features);
        assert_eq!(result.movement, 0.0);
        assert_eq!(result.combat, 0.0);
    }

    #[test]
    fn modifier_validity() {
        assert!(TerrainModifier::NEUTRAL.is_valid());
        assert!(TerrainModifier::new(0.0, 2.0).is_valid());
        assert!(!TerrainModifier::new(-0.1, 1.0).is_valid());
        assert!(!TerrainModifier::new(1.0, f64::NAN).is_valid());
        assert!(!TerrainModifier::new(f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn multiplication_is_fieldwise() {
        let product = TerrainModifier::new(2.0, 0.5) * TerrainModifier::new(0.25, 4.0);
        assert_eq!(product, TerrainModifier::new(0.5, 2.0));
    }
}
