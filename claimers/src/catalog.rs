//! Troop types and hand-authored territories, loaded from YAML.
//!
//! ```yaml
//! troops:
//!   - name: Ice Wizard
//!     movement_type: ground
//!     temperature_preference: { min: -50, max: 0 }
//!     terrain_modifiers:
//!       snow: { movement: 1.2, combat: 1.3 }
//!       frozen: { movement: 1.1, combat: 1.0 }
//! territories:
//!   - position: { x: 0, y: 0 }
//!     features: { terrain_type: snow, temperature: -70, elevation: 20, tags: [frozen] }
//! ```

use std::{collections::HashSet, fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    board::Position,
    terrain::{
        MovementType, TemperatureRange, TerrainModifier, TerrainTag, TerrainType,
        TerritoryFeatures, TroopType, MAX_TEMPERATURE, MIN_TEMPERATURE,
    },
};

/// Error returned when loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid catalog: {0}")]
    Validation(String),
}

/// Features authored for the tile at a particular position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoredTerritory {
    pub position: Position,
    pub features: TerritoryFeatures,
}

/// The troop types available in a game and any territories placed by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub troops: Vec<TroopType>,
    #[serde(default)]
    pub territories: Vec<AuthoredTerritory>,
}

impl Catalog {
    /// Parse and validate a catalog.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_yaml_str(&fs::read_to_string(path)?)?;
        debug!(
            path = %path.display(),
            troops = catalog.troops.len(),
            territories = catalog.territories.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Serialize the catalog as YAML.
    pub fn to_yaml_string(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that the catalog makes sense: temperature preferences are not inverted,
    /// modifiers are finite and non-negative, troop names are unique ignoring case,
    /// authored temperatures are in `[-100, 100]` and no position is authored twice.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for troop in &self.troops {
            if troop.name.trim().is_empty() {
                return Err(CatalogError::Validation("troop name is empty".into()));
            }
            if !names.insert(troop.name.to_lowercase()) {
                return Err(CatalogError::Validation(format!(
                    "troop {:?} defined more than once",
                    troop.name
                )));
            }
            let range = troop.temperature_preference;
            if range.min > range.max {
                return Err(CatalogError::Validation(format!(
                    "troop {:?} has inverted temperature preference [{}, {}]",
                    troop.name, range.min, range.max
                )));
            }
            for (key, modifier) in &troop.terrain_modifiers {
                if !modifier.is_valid() {
                    return Err(CatalogError::Validation(format!(
                        "troop {:?} has invalid modifier for {}: {:?}",
                        troop.name, key, modifier
                    )));
                }
            }
        }

        let mut positions = HashSet::new();
        for territory in &self.territories {
            if !territory.features.temperature_in_bounds() {
                return Err(CatalogError::Validation(format!(
                    "territory at {} has temperature {} outside [{}, {}]",
                    territory.position,
                    territory.features.temperature,
                    MIN_TEMPERATURE,
                    MAX_TEMPERATURE
                )));
            }
            if !positions.insert(territory.position) {
                return Err(CatalogError::Validation(format!(
                    "territory at {} defined more than once",
                    territory.position
                )));
            }
        }
        Ok(())
    }

    /// Find a troop type by name, ignoring case.
    pub fn troop(&self, name: &str) -> Option<&TroopType> {
        let name = name.trim();
        self.troops
            .iter()
            .find(|troop| troop.name.eq_ignore_ascii_case(name))
    }

    /// Features authored for a position, if any.
    pub fn territory_at(&self, position: Position) -> Option<&TerritoryFeatures> {
        self.territories
            .iter()
            .find(|territory| territory.position == position)
            .map(|territory| &territory.features)
    }

    /// The troop types shipped with the game.
    pub fn builtin() -> Self {
        let m = TerrainModifier::new;
        let troops = vec![
            TroopType::new("Ice Wizard", MovementType::Ground, TemperatureRange::new(-50, 0))
                .with_modifier(TerrainType::Snow, m(1.2, 1.3))
                .with_modifier(TerrainTag::Frozen, m(1.1, 1.0))
                .with_modifier(TerrainType::Desert, m(0.7, 0.6)),
            TroopType::new("Infantry", MovementType::Ground, TemperatureRange::new(-10, 35))
                .with_modifier(TerrainType::Plains, m(1.1, 1.0))
                .with_modifier(TerrainType::Mountains, m(0.6, 1.1))
                .with_modifier(TerrainType::Swamp, m(0.5, 0.8))
                .with_modifier(TerrainType::Water, m(0.0, 0.0))
                .with_modifier(TerrainTag::Rocky, m(0.8, 1.1))
                .with_modifier(TerrainTag::Forested, m(0.9, 1.1)),
            TroopType::new("Griffin Riders", MovementType::Flying, TemperatureRange::new(-20, 30))
                .with_modifier(TerrainType::Mountains, m(1.0, 1.2))
                .with_modifier(TerrainType::Forest, m(1.0, 0.8))
                .with_modifier(TerrainTag::Forested, m(1.0, 0.9)),
            TroopType::new("Marines", MovementType::Amphibious, TemperatureRange::new(0, 40))
                .with_modifier(TerrainType::Water, m(0.8, 0.9))
                .with_modifier(TerrainType::Swamp, m(1.0, 1.0))
                .with_modifier(TerrainTag::Coastal, m(1.2, 1.2))
                .with_modifier(TerrainTag::Marshy, m(1.1, 1.0)),
            TroopType::new("Sea Serpents", MovementType::Aquatic, TemperatureRange::new(-5, 30))
                .with_modifier(TerrainType::Water, m(1.5, 1.4))
                .with_modifier(TerrainTag::Coastal, m(1.0, 1.1))
                .with_modifier(TerrainType::Plains, m(0.0, 0.3))
                .with_modifier(TerrainType::Desert, m(0.0, 0.1)),
        ];
        Catalog {
            troops,
            territories: Vec::new(),
        }
    }
}
