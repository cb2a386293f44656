//! Features describing a single map territory.

use serde::{Deserialize, Serialize};

use crate::{
    ids::{MapId, TerritoryId},
    terrain::{TerrainTag, TerrainType},
};

/// Coldest temperature a territory is authored with.
pub const MIN_TEMPERATURE: i32 = -100;
/// Hottest temperature a territory is authored with.
pub const MAX_TEMPERATURE: i32 = 100;

/// Environmental description of a territory.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TerritoryFeatures {
    /// Nominally in `[-100, 100]`: -100 is frozen, 100 is scorching. Values outside that
    /// range are still accepted when computing modifiers.
    #[serde(default)]
    pub temperature: i32,
    /// 0 is sea level, positive values are higher ground and negative values valleys.
    #[serde(default)]
    pub elevation: i32,
    /// The single primary terrain of the territory.
    pub terrain_type: TerrainType,
    /// Secondary descriptors, in order. Duplicates are kept and each occurrence counts.
    #[serde(default)]
    pub tags: Vec<TerrainTag>,
}

impl TerritoryFeatures {
    /// Features for the given terrain at sea level, temperature 0 and without tags.
    pub fn new(terrain_type: TerrainType) -> Self {
        Self {
            temperature: 0,
            elevation: 0,
            terrain_type,
            tags: Vec::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: i32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Append a tag. Appending a tag that is already present adds a second occurrence.
    pub fn with_tag(mut self, tag: TerrainTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_tags<I: IntoIterator<Item = TerrainTag>>(mut self, tags: I) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Whether the temperature lies in `[MIN_TEMPERATURE, MAX_TEMPERATURE]`.
    pub fn temperature_in_bounds(&self) -> bool {
        (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature)
    }

    /// Whether any occurrence of the tag is present.
    pub fn has_tag(&self, tag: TerrainTag) -> bool {
        self.tags.contains(&tag)
    }
}

impl Default for TerritoryFeatures {
    /// Temperate plains at sea level.
    fn default() -> Self {
        Self::new(TerrainType::Plains)
    }
}

/// A territory of a map. Read-only as far as the modifier engine is concerned.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MapTerritory {
    pub id: TerritoryId,
    /// The map (board) this territory belongs to.
    pub map_id: MapId,
    pub features: TerritoryFeatures,
}

impl MapTerritory {
    /// Create a territory with a freshly generated id.
    pub fn new(map_id: MapId, features: TerritoryFeatures) -> Self {
        Self {
            id: TerritoryId::new(),
            map_id,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_tag_order_and_duplicates() {
        let features = TerritoryFeatures::new(TerrainType::Mountains)
            .with_tag(TerrainTag::Rocky)
            .with_tags(vec![TerrainTag::Frozen, TerrainTag::Rocky]);
        assert_eq!(
            features.tags,
            vec![TerrainTag::Rocky, TerrainTag::Frozen, TerrainTag::Rocky]
        );
        assert!(features.has_tag(TerrainTag::Frozen));
        assert!(!features.has_tag(TerrainTag::Arid));
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        let features = TerritoryFeatures::default();
        assert!(features.clone().with_temperature(-100).temperature_in_bounds());
        assert!(features.clone().with_temperature(100).temperature_in_bounds());
        assert!(!features.clone().with_temperature(101).temperature_in_bounds());
        assert!(!features.with_temperature(-101).temperature_in_bounds());
    }

    #[test]
    fn features_deserialize_with_defaults() {
        let features: TerritoryFeatures =
            serde_yaml::from_str("terrain_type: snow\ntags: [frozen, rocky]\n").unwrap();
        assert_eq!(features.terrain_type, TerrainType::Snow);
        assert_eq!(features.temperature, 0);
        assert_eq!(features.elevation, 0);
        assert_eq!(features.tags, vec![TerrainTag::Frozen, TerrainTag::Rocky]);
    }
}
