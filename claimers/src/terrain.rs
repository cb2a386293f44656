//! Terrain of map territories and how it affects troops.
//!
//! A [`MapTerritory`] carries [`TerritoryFeatures`]: one primary [`TerrainType`], an
//! ordered list of secondary [`TerrainTag`]s, an elevation and a temperature. A
//! [`TroopType`] reacts to those features through its table of [`TerrainModifier`]s,
//! keyed by [`TerrainKey`], and its preferred [`TemperatureRange`].
//! [`compute_modifiers`] folds all of it into a single movement and combat multiplier.

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{
    features::{MapTerritory, TerritoryFeatures, MAX_TEMPERATURE, MIN_TEMPERATURE},
    modifier::{
        compute_modifiers, elevation_factor, temperature_penalty, TerrainModifier,
        GROUND_HIGH_ELEVATION_FACTOR, HIGH_ELEVATION, MAX_TEMPERATURE_PENALTY,
    },
    troop::{MovementType, TemperatureRange, TroopType},
};

mod features;
mod modifier;
#[cfg(feature = "rng_gen")]
pub mod random;
mod troop;

/// Error returned when a string does not name a known terrain label.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("unknown {kind} {label:?}")]
pub struct ParseLabelError {
    /// Which kind of label was being parsed.
    kind: &'static str,
    /// The text that failed to parse.
    label: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, label: &str) -> Self {
        Self {
            kind,
            label: label.to_owned(),
        }
    }

    /// The text that failed to parse.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Declares a fieldless enum whose variants are identified by lowercase labels, with
/// `Display`, `FromStr` and serde support all agreeing on those labels.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The lowercase label naming this variant.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseLabelError;

            /// Parses the label, ignoring ASCII case and surrounding whitespace.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseLabelError::new($kind, s))
            }
        }
    };
}

labeled_enum!(
    /// The primary terrain of a territory. Every territory has exactly one.
    TerrainType, "terrain type" {
        Plains => "plains",
        Hills => "hills",
        Mountains => "mountains",
        Snow => "snow",
        Desert => "desert",
        Forest => "forest",
        Swamp => "swamp",
        Water => "water",
    }
);

labeled_enum!(
    /// Secondary descriptor of a territory, independent of its [`TerrainType`].
    TerrainTag, "terrain tag" {
        Rocky => "rocky",
        Forested => "forested",
        Frozen => "frozen",
        Arid => "arid",
        Marshy => "marshy",
        Coastal => "coastal",
        Riverside => "riverside",
    }
);

/// Key into a troop's terrain modifier table: either a primary terrain type or a tag.
///
/// Terrain and tag labels never collide, so a key is written as its bare label, e.g.
/// `snow` or `rocky`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TerrainKey {
    /// Matches territories whose primary terrain is this type.
    Terrain(TerrainType),
    /// Matches each occurrence of this tag on a territory.
    Tag(TerrainTag),
}

impl TerrainKey {
    /// The label of the terrain type or tag.
    pub fn label(self) -> &'static str {
        match self {
            TerrainKey::Terrain(terrain) => terrain.label(),
            TerrainKey::Tag(tag) => tag.label(),
        }
    }
}

impl From<TerrainType> for TerrainKey {
    fn from(terrain: TerrainType) -> Self {
        TerrainKey::Terrain(terrain)
    }
}

impl From<TerrainTag> for TerrainKey {
    fn from(tag: TerrainTag) -> Self {
        TerrainKey::Tag(tag)
    }
}

impl fmt::Display for TerrainKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for TerrainKey {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<TerrainType>()
            .map(TerrainKey::Terrain)
            .or_else(|_| s.parse::<TerrainTag>().map(TerrainKey::Tag))
            .map_err(|_| ParseLabelError::new("terrain type or tag", s))
    }
}

impl TryFrom<String> for TerrainKey {
    type Error = ParseLabelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TerrainKey> for String {
    fn from(key: TerrainKey) -> Self {
        key.label().to_owned()
    }
}
