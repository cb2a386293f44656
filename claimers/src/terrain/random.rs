//! Random generation of territory features, for boards that are not authored by hand.

use once_cell::sync::Lazy;
use rand::{
    distributions::{Distribution, Standard, Uniform},
    seq::SliceRandom,
    Rng,
};

use crate::terrain::{
    MovementType, TerrainTag, TerrainType, TerritoryFeatures, MAX_TEMPERATURE, MIN_TEMPERATURE,
};

/// Spread of temperatures around the typical temperature of a terrain type.
static TEMPERATURE_JITTER: Lazy<Uniform<i32>> = Lazy::new(|| Uniform::new_inclusive(-15, 15));

/// Most tags generated for a single territory.
const MAX_TAGS: usize = 2;

impl Distribution<TerrainType> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainType {
        TerrainType::ALL[rng.gen_range(0, TerrainType::ALL.len())]
    }
}

impl Distribution<TerrainTag> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainTag {
        TerrainTag::ALL[rng.gen_range(0, TerrainTag::ALL.len())]
    }
}

impl Distribution<MovementType> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MovementType {
        MovementType::ALL[rng.gen_range(0, MovementType::ALL.len())]
    }
}

/// Typical temperature, elevation span and candidate tags of a terrain type.
struct Climate {
    temperature: i32,
    elevation: (i32, i32),
    tags: &'static [TerrainTag],
}

fn climate(terrain: TerrainType) -> Climate {
    use TerrainTag::*;
    let (temperature, elevation, tags): (i32, (i32, i32), &'static [TerrainTag]) = match terrain {
        TerrainType::Plains => (20, (0, 30), &[Riverside, Arid]),
        TerrainType::Hills => (10, (30, 70), &[Rocky, Forested]),
        TerrainType::Mountains => (-10, (60, 100), &[Rocky, Frozen]),
        TerrainType::Snow => (-60, (0, 80), &[Frozen, Rocky]),
        TerrainType::Desert => (70, (0, 40), &[Arid, Rocky]),
        TerrainType::Forest => (15, (0, 40), &[Forested, Riverside]),
        TerrainType::Swamp => (25, (-20, 5), &[Marshy, Forested]),
        TerrainType::Water => (10, (-50, 0), &[Coastal]),
    };
    Climate {
        temperature,
        elevation,
        tags,
    }
}

/// Draw features for one territory. The temperature, elevation and tags are kept
/// plausible for the drawn terrain type, and a territory never gets the same tag twice.
pub fn random_features<R: Rng + ?Sized>(rng: &mut R) -> TerritoryFeatures {
    let terrain_type: TerrainType = rng.gen();
    let climate = climate(terrain_type);

    let temperature = (climate.temperature + TEMPERATURE_JITTER.sample(rng))
        .max(MIN_TEMPERATURE)
        .min(MAX_TEMPERATURE);
    let (low, high) = climate.elevation;
    let elevation = rng.gen_range(low, high + 1);

    let count = rng.gen_range(0, MAX_TAGS.min(climate.tags.len()) + 1);
    let tags = climate.tags.choose_multiple(rng, count).copied();

    TerritoryFeatures::new(terrain_type)
        .with_temperature(temperature)
        .with_elevation(elevation)
        .with_tags(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn generated_features_stay_plausible() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let features = random_features(&mut rng);
            let climate = climate(features.terrain_type);
            assert!(features.temperature_in_bounds());
            assert!(features.elevation >= climate.elevation.0);
            assert!(features.elevation <= climate.elevation.1);
            assert!(features.tags.len() <= MAX_TAGS);
            for (i, tag) in features.tags.iter().enumerate() {
                assert!(climate.tags.contains(tag));
                assert!(!features.tags[i + 1..].contains(tag));
            }
        }
    }

    #[test]
    fn same_seed_same_features() {
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| random_features(&mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| random_features(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
