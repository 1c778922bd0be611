//! Seed vectors, jump tables and the seed legality check.
//!
//! A [`SeedVector`] is the complete description of a point in a generator's
//! sequence: `R` 32-bit words, laid out in the order the recurrence reads
//! them. Streams persist nothing else, so three seed vectors are enough to
//! checkpoint a stream exactly.

use std::fmt;

use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use rand_seeder::Seeder;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::error::InvalidSeed;
use crate::gf2;

/// The single forbidden value for a seed whose only non-zero word is the last.
pub const FORBIDDEN_LAST_WORD: u32 = 0x8000_0000;

#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedVector<const R: usize>(#[serde_as(as = "[_; R]")] [u32; R]);

impl<const R: usize> SeedVector<R> {
    /// Wrap raw words without checking them.
    ///
    /// Used for compile-time constants and for values produced by the jump
    /// operator; caller-supplied seeds should go through [`SeedVector::checked`].
    pub const fn new(words: [u32; R]) -> Self {
        Self(words)
    }

    /// Wrap raw words after running [`validate`].
    pub fn checked(words: [u32; R]) -> Result<Self, InvalidSeed> {
        let seed = Self(words);
        validate(&seed)?;
        Ok(seed)
    }

    /// Build a seed from a caller-provided slice of exactly `R` words.
    pub fn try_from_slice(words: &[u32]) -> Result<Self, InvalidSeed> {
        let words: [u32; R] = words.try_into().map_err(|_| InvalidSeed::WrongLength {
            expected: R,
            found: words.len(),
        })?;
        Self::checked(words)
    }

    /// Derive a legal seed from an arbitrary phrase.
    ///
    /// The phrase is hashed into a ChaCha8 generator whose output fills the
    /// words. Identical phrases always give identical seeds.
    pub fn from_phrase(phrase: &str) -> Self {
        let mut rng: ChaCha8Rng = Seeder::from(phrase).make_rng();
        loop {
            let mut words = [0u32; R];
            for word in words.iter_mut() {
                *word = rng.next_u32();
            }
            if let Ok(seed) = Self::checked(words) {
                return seed;
            }
        }
    }

    pub fn words(&self) -> &[u32; R] {
        &self.0
    }

    pub fn into_words(self) -> [u32; R] {
        self.0
    }
}

impl<const R: usize> AsRef<[u32]> for SeedVector<R> {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl<const R: usize> fmt::Display for SeedVector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, word) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{word}")?;
        }
        f.write_str("}")
    }
}

/// Check a seed against the legality rules shared by the WELL family.
///
/// A seed is illegal when every word is zero, or when the only non-zero word
/// is the last one and it equals [`FORBIDDEN_LAST_WORD`].
pub fn validate<const R: usize>(seed: &SeedVector<R>) -> Result<(), InvalidSeed> {
    let mut nonzero = seed.0.iter().enumerate().filter(|&(_, &word)| word != 0);
    match (nonzero.next(), nonzero.next()) {
        (None, _) => Err(InvalidSeed::AllZero),
        (Some((index, &word)), None) if index + 1 == R && word == FORBIDDEN_LAST_WORD => {
            Err(InvalidSeed::ForbiddenLastWord { value: word })
        }
        _ => Ok(()),
    }
}

/// Coefficients of `z^d mod P(z)` for a fixed jump distance `d`.
///
/// Bit `k` of word `j` holds the coefficient of `z^(32j + k)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JumpTable<const R: usize>([u32; R]);

impl<const R: usize> JumpTable<R> {
    pub const fn new(words: [u32; R]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[u32; R] {
        &self.0
    }

    /// Coefficient of `z^index`.
    pub fn bit(&self, index: usize) -> bool {
        (self.0[index / 32] >> (index % 32)) & 1 == 1
    }

    /// Table for the sum of both distances, reduced modulo `modulus`.
    pub fn compose(&self, other: &Self, modulus: &[u32; R]) -> Self {
        Self(gf2::mul_mod(&self.0, &other.0, modulus))
    }
}
