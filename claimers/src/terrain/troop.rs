//! Troop types and their terrain preferences.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    ids::TroopTypeId,
    terrain::{modifier, ParseLabelError, TerrainKey, TerrainModifier, TerritoryFeatures},
};

/// How a troop gets around. Decides how elevation affects it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Ground,
    Flying,
    Aquatic,
    Amphibious,
}

impl MovementType {
    /// Every movement type, in declaration order.
    pub const ALL: &'static [MovementType] = &[
        MovementType::Ground,
        MovementType::Flying,
        MovementType::Aquatic,
        MovementType::Amphibious,
    ];

    /// The lowercase label naming this movement type.
    pub fn label(self) -> &'static str {
        match self {
            MovementType::Ground => "ground",
            MovementType::Flying => "flying",
            MovementType::Aquatic => "aquatic",
            MovementType::Amphibious => "amphibious",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for MovementType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MovementType::ALL
            .iter()
            .copied()
            .find(|movement| trimmed.eq_ignore_ascii_case(movement.label()))
            .ok_or_else(|| ParseLabelError::new("movement type", s))
    }
}

/// Closed interval of temperatures at which a troop suffers no temperature penalty.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: i32,
    pub max: i32,
}

impl TemperatureRange {
    /// Construct the range `[min, max]`. Panics if `min > max`.
    pub fn new(min: i32, max: i32) -> Self {
        match Self::try_new(min, max) {
            Some(range) => range,
            None => panic!("temperature range is inverted: [{}, {}]", min, max),
        }
    }

    /// Construct the range `[min, max]`, or `None` if `min > max`.
    pub fn try_new(min: i32, max: i32) -> Option<Self> {
        if min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Whether the temperature lies inside the range, bounds included.
    pub fn contains(&self, temperature: i32) -> bool {
        self.min <= temperature && temperature <= self.max
    }

    /// How far the temperature lies outside the range, measured from the nearest bound.
    /// Zero when it is inside.
    pub fn distance(&self, temperature: i32) -> u32 {
        let temperature = i64::from(temperature);
        let below = i64::from(self.min) - temperature;
        let above = temperature - i64::from(self.max);
        // The difference of two i32s always fits in a u32.
        if below > 0 {
            below as u32
        } else if above > 0 {
            above as u32
        } else {
            0
        }
    }
}

/// A category of military unit and how it copes with terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroopType {
    #[serde(default, skip_serializing)]
    pub id: TroopTypeId,
    pub name: String,
    pub movement_type: MovementType,
    pub temperature_preference: TemperatureRange,
    /// Effect of each terrain type or tag on this troop. Terrain that is missing from the
    /// table has no effect at all, so troops only list the terrain they care about.
    #[serde(default)]
    pub terrain_modifiers: BTreeMap<TerrainKey, TerrainModifier>,
}

impl TroopType {
    /// Create a troop type with no terrain modifiers and a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        movement_type: MovementType,
        temperature_preference: TemperatureRange,
    ) -> Self {
        Self {
            id: TroopTypeId::new(),
            name: name.into(),
            movement_type,
            temperature_preference,
            terrain_modifiers: BTreeMap::new(),
        }
    }

    /// Set the modifier applied for the given terrain type or tag, replacing any previous
    /// entry for it.
    pub fn with_modifier<K: Into<TerrainKey>>(mut self, key: K, modifier: TerrainModifier) -> Self {
        self.terrain_modifiers.insert(key.into(), modifier);
        self
    }

    /// Get the modifier listed for the key, if any.
    pub fn modifier_for<K: Into<TerrainKey>>(&self, key: K) -> Option<&TerrainModifier> {
        self.terrain_modifiers.get(&key.into())
    }

    /// Compute the modifiers this troop gets on territory with the given features. See
    /// [`compute_modifiers`][crate::terrain::compute_modifiers].
    pub fn modifiers_on(&self, features: &TerritoryFeatures) -> TerrainModifier {
        modifier::modifiers_on_features(self, features)
    }
}
