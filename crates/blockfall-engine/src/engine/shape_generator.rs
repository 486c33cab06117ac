use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Supplies the shape of each newly spawned piece.
///
/// [`Board`](crate::Board) draws from a `ShapeSource` whenever it needs a
/// fresh piece, so tests can script the sequence and the game can replay a
/// seeded one.
pub trait ShapeSource {
    fn next_shape(&mut self) -> ShapeKind;
}

impl<S> ShapeSource for &mut S
where
    S: ShapeSource + ?Sized,
{
    fn next_shape(&mut self) -> ShapeKind {
        (**self).next_shape()
    }
}

/// Uniform random shape source.
///
/// Every draw picks one of the 7 shapes with equal probability, independently
/// of previous draws.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ShapeGenerator, ShapeSource as _};
///
/// let seed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = ShapeGenerator::with_seed(seed);
/// let mut b = ShapeGenerator::with_seed(seed);
/// for _ in 0..10 {
///     assert_eq!(a.next_shape(), b.next_shape());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    seed: ShapeSeed,
    rng: Pcg32,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeGenerator {
    /// Creates a generator with a random seed.
    ///
    /// For deterministic shape sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.seed
    }
}

impl ShapeSource for ShapeGenerator {
    fn next_shape(&mut self) -> ShapeKind {
        self.rng.random()
    }
}

/// Seed for deterministic shape generation.
///
/// A 128-bit (16-byte) seed for the generator's RNG. Its text form, used by
/// `Display`, `FromStr` and serde, is 32 hex digits.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeSeed;
/// use rand::Rng as _;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let parsed: ShapeSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

/// Error returned when parsing a [`ShapeSeed`] from text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseShapeSeedError {
    #[display("invalid seed: expected 32 hex digits, got {_0} characters")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: {_0:?} is not a hex digit")]
    InvalidDigit(#[error(not(source))] char),
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for ShapeSeed {
    type Err = ParseShapeSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 32 {
            return Err(ParseShapeSeedError::InvalidLength(len));
        }
        let mut num = 0_u128;
        for c in s.chars() {
            let digit = c.to_digit(16).ok_or(ParseShapeSeedError::InvalidDigit(c))?;
            num = (num << 4) | u128::from(digit);
        }
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `ShapeSeed` values with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}
