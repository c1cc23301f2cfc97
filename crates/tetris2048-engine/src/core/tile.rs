use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A single numbered cell.
///
/// The value is always a power of two no smaller than 2. Freshly spawned tiles
/// carry 2 or 4; larger values only appear through merging or score-threshold
/// doubling. How a tile looks is decided by the renderer from its value.
///
/// # Example
///
/// ```
/// use tetris2048_engine::Tile;
///
/// let tile = Tile::new(4).unwrap();
/// assert_eq!(tile.doubled().value(), 8);
/// assert!(Tile::new(6).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, Serialize, Deserialize,
)]
#[display("{value}")]
#[serde(try_from = "u32", into = "u32")]
pub struct Tile {
    value: u32,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("tile value must be a power of two no smaller than 2, got {value}")]
pub struct InvalidTileValueError {
    value: u32,
}

impl Tile {
    pub const TWO: Self = Self { value: 2 };
    pub const FOUR: Self = Self { value: 4 };

    pub fn new(value: u32) -> Result<Self, InvalidTileValueError> {
        if value < 2 || !value.is_power_of_two() {
            return Err(InvalidTileValueError { value });
        }
        Ok(Self { value })
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    /// Returns a tile with twice the value.
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self {
            value: self.value.saturating_mul(2),
        }
    }
}

impl TryFrom<u32> for Tile {
    type Error = InvalidTileValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tile> for u32 {
    fn from(tile: Tile) -> Self {
        tile.value
    }
}

/// Spawned tiles are 2 or 4 with equal probability.
impl Distribution<Tile> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if rng.random::<bool>() {
            Tile::FOUR
        } else {
            Tile::TWO
        }
    }
}
