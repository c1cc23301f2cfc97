use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Board, Piece, PieceKind};

/// Source of new pieces.
///
/// Kinds are drawn uniformly from all eight [`PieceKind`]s and every tile is
/// 2 or 4. The kind of the piece after the current one is decided in advance
/// so it can be shown as a preview.
///
/// # Example
///
/// ```
/// use tetris2048_engine::{Board, PieceGenerator};
///
/// let board = Board::new(20, 12).unwrap();
/// let mut generator = PieceGenerator::new();
///
/// let upcoming = generator.peek_next();
/// let piece = generator.spawn_next(&board);
/// assert_eq!(piece.kind(), upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    next: PieceKind,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the generator's random number generator, written as 32
/// hexadecimal characters. Equal seeds produce equal piece sequences, which
/// makes a game reproducible.
///
/// # Example
///
/// ```
/// use tetris2048_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    Length { len: usize },
    #[display("invalid hex: {input:?}")]
    Digits { input: String },
}

impl PieceSeed {
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::Length { len: s.len() });
        }
        // `from_str_radix` would also accept a leading sign.
        let digits_err = || ParsePieceSeedError::Digits {
            input: s.to_owned(),
        };
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(digits_err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| digits_err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let next = rng.random();
        Self { rng, next }
    }

    /// Returns the kind of the piece the next [`Self::spawn_next`] produces.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.next
    }

    /// Spawns the previewed piece on `board` and draws a new preview.
    pub fn spawn_next(&mut self, board: &Board) -> Piece {
        let kind = self.next;
        self.next = self.rng.random();
        Piece::spawn(kind, board, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_same_seed_same_pieces() {
        let board = Board::new(20, 12).unwrap();
        let mut generator1 = PieceGenerator::with_seed(SEED);
        let mut generator2 = PieceGenerator::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(generator1.peek_next(), generator2.peek_next());
            assert_eq!(generator1.spawn_next(&board), generator2.spawn_next(&board));
        }
    }

    #[test]
    fn test_all_kinds_appear() {
        let board = Board::new(20, 12).unwrap();
        let mut generator = PieceGenerator::with_seed(SEED);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[generator.spawn_next(&board).kind() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_seed_text_format() {
        assert_eq!(SEED.to_string(), "123456789abcdef01122334455667788");
        assert_eq!(
            "123456789ABCDEF01122334455667788"
                .parse::<PieceSeed>()
                .unwrap(),
            SEED
        );
        assert_eq!(
            PieceSeed([0; 16]).to_string(),
            "00000000000000000000000000000000"
        );
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!(matches!(
            "0123".parse::<PieceSeed>(),
            Err(ParsePieceSeedError::Length { len: 4 })
        ));
        assert!(matches!(
            "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<PieceSeed>(),
            Err(ParsePieceSeedError::Digits { .. })
        ));
        assert!(matches!(
            "+123456789abcdef0123456789abcdef".parse::<PieceSeed>(),
            Err(ParsePieceSeedError::Digits { .. })
        ));
    }

    #[test]
    fn test_seed_serde_as_hex_string() {
        let json = serde_json::to_string(&SEED).unwrap();
        assert_eq!(json, "\"123456789abcdef01122334455667788\"");
        assert_eq!(serde_json::from_str::<PieceSeed>(&json).unwrap(), SEED);

        let err = serde_json::from_str::<PieceSeed>("\"\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }
}
