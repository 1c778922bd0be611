use std::fmt::Debug;

use crate::error::InvalidSeed;
use crate::seed::{self, JumpTable, SeedVector};

/// A long-period linear recurrence over GF(2) with `R` words of state.
///
/// Implementors supply the bit-level transition and the constants that tie
/// it to its characteristic polynomial. Everything else (jumping, stream and
/// substream bookkeeping, the registry) is written once against this trait.
pub trait Recurrence<const R: usize>: Clone + Debug {
    /// Short family name used in display strings and logs.
    const NAME: &'static str;

    /// Characteristic polynomial `P(z)` of the transition.
    const CHARACTERISTIC: [u32; R];

    /// Seed handed out by a fresh registry.
    const DEFAULT_PACKAGE_SEED: SeedVector<R>;

    /// `z^W mod P(z)`, the spacing between consecutive substreams.
    const SUBSTREAM_JUMP: JumpTable<R>;

    /// `z^Z mod P(z)`, the spacing between consecutive streams.
    const STREAM_JUMP: JumpTable<R>;

    /// A generator positioned at `seed`.
    fn from_seed(seed: &SeedVector<R>) -> Self;

    /// Reposition at `seed`; the cursor returns to its initial position.
    fn load(&mut self, seed: &SeedVector<R>);

    /// Advance one step and return the raw output word.
    fn step_raw(&mut self) -> u32;

    /// The current position, in the same layout [`Recurrence::load`] accepts.
    fn state(&self) -> SeedVector<R>;

    fn validate(seed: &SeedVector<R>) -> Result<(), InvalidSeed> {
        seed::validate(seed)
    }

    /// Map a raw output word into the open interval `(0, 1)`.
    ///
    /// The word is read as unsigned, zero stands for `2^32`, and the result is
    /// scaled by `1 / (2^32 + 1)`.
    fn unit_from_raw(raw: u32) -> f64 {
        const NORM: f64 = 1.0 / 4_294_967_297.0;
        let value = if raw == 0 {
            4_294_967_296.0
        } else {
            f64::from(raw)
        };
        value * NORM
    }
}
