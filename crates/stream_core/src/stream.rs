//! Reproducible random streams with substreams.
//!
//! A [`Stream`] remembers where it started (`stream_seed`), where its
//! current substream started (`substream_seed`) and owns a live generator.
//! Streams cut from the same registry are `Z` steps apart; substreams inside
//! a stream are `W` steps apart, with `W` far smaller than `Z`.
//!
//! ```text
//! new ──► SubstreamStart(0) ──reset_next_substream──► SubstreamStart(n + 1)
//!              ▲     │                                        │
//!              │     └─reset_start_substream (same n)         │
//!              └───────────────reset_start_stream─────────────┘
//! ```

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::InvalidSeed;
use crate::jump::jump;
use crate::random::RandomStream;
use crate::recurrence::Recurrence;
use crate::registry::{SeedRegistry, SharedSeedRegistry};
use crate::seed::SeedVector;

/// Weight of the second draw when increased precision is on (`2^-24`).
const INV_TWO_24: f64 = 5.960_464_477_539_062_5e-8;

#[derive(Clone, Debug)]
pub struct Stream<G, const R: usize> {
    stream_seed: SeedVector<R>,
    substream_seed: SeedVector<R>,
    generator: G,
    substream_index: u64,
    name: Option<String>,
    antithetic: bool,
    increased_precision: bool,
}

/// Everything needed to rebuild a [`Stream`] at its exact position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot<const R: usize> {
    pub stream_seed: SeedVector<R>,
    pub substream_seed: SeedVector<R>,
    pub state: SeedVector<R>,
    pub substream_index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub antithetic: bool,
    #[serde(default)]
    pub increased_precision: bool,
}

impl<G: Recurrence<R>, const R: usize> Stream<G, R> {
    /// Cut the next stream from `registry`.
    pub fn new(registry: &mut SeedRegistry<G, R>) -> Self {
        Self::starting_at(registry.take_and_advance())
    }

    /// Cut the next stream from `registry` and label it.
    pub fn named(registry: &mut SeedRegistry<G, R>, name: impl Into<String>) -> Self {
        Self::new(registry).with_name(name)
    }

    /// Cut the next stream from a registry shared between threads.
    pub fn from_shared(registry: &SharedSeedRegistry<G, R>) -> Self {
        Self::starting_at(registry.take_and_advance())
    }

    /// Start a stream at an explicit seed, outside the registry's spacing.
    pub fn from_seed(seed: SeedVector<R>) -> Result<Self, InvalidSeed> {
        G::validate(&seed)?;
        Ok(Self::starting_at(seed))
    }

    /// Rebuild a stream from a snapshot.
    pub fn from_snapshot(snapshot: &StreamSnapshot<R>) -> Result<Self, InvalidSeed> {
        let mut stream = Self::from_seed(snapshot.stream_seed)?;
        stream.restore(snapshot)?;
        Ok(stream)
    }

    fn starting_at(seed: SeedVector<R>) -> Self {
        debug!(family = G::NAME, seed = %seed, "stream created");
        Self {
            stream_seed: seed,
            substream_seed: seed,
            generator: G::from_seed(&seed),
            substream_index: 0,
            name: None,
            antithetic: false,
            increased_precision: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace this stream's starting seed and rewind to it.
    ///
    /// Only this stream moves; its start is no longer on the registry's grid.
    pub fn set_seed(&mut self, seed: SeedVector<R>) -> Result<(), InvalidSeed> {
        G::validate(&seed)?;
        self.stream_seed = seed;
        self.reset_start_stream();
        Ok(())
    }

    pub fn reset_start_stream(&mut self) {
        self.substream_seed = self.stream_seed;
        self.substream_index = 0;
        self.reset_start_substream();
    }

    pub fn reset_start_substream(&mut self) {
        self.generator.load(&self.substream_seed);
    }

    pub fn reset_next_substream(&mut self) {
        self.substream_seed = jump::<G, R>(&self.substream_seed, &G::SUBSTREAM_JUMP);
        self.substream_index += 1;
        trace!(
            family = G::NAME,
            substream = self.substream_index,
            "advanced to next substream"
        );
        self.reset_start_substream();
    }

    /// One raw output word.
    pub fn next_u32(&mut self) -> u32 {
        self.generator.step_raw()
    }

    pub fn next_int(&mut self) -> i32 {
        self.next_u32() as i32
    }

    pub fn next_double(&mut self) -> f64 {
        let mut u = G::unit_from_raw(self.generator.step_raw());
        if self.increased_precision {
            u = (u + G::unit_from_raw(self.generator.step_raw()) * INV_TWO_24) % 1.0;
        }
        if self.antithetic {
            1.0 - u
        } else {
            u
        }
    }

    /// Current position of the live generator.
    pub fn state(&self) -> SeedVector<R> {
        self.generator.state()
    }

    pub fn stream_seed(&self) -> SeedVector<R> {
        self.stream_seed
    }

    pub fn substream_seed(&self) -> SeedVector<R> {
        self.substream_seed
    }

    /// Substreams advanced since the stream start.
    pub fn substream_index(&self) -> u64 {
        self.substream_index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Return `1 - u` instead of `u` from [`Stream::next_double`].
    pub fn set_antithetic(&mut self, antithetic: bool) {
        self.antithetic = antithetic;
    }

    pub fn is_antithetic(&self) -> bool {
        self.antithetic
    }

    /// Combine two raw words per double for more than 32 bits of resolution.
    pub fn set_increased_precision(&mut self, increased: bool) {
        self.increased_precision = increased;
    }

    pub fn has_increased_precision(&self) -> bool {
        self.increased_precision
    }

    pub fn snapshot(&self) -> StreamSnapshot<R> {
        StreamSnapshot {
            stream_seed: self.stream_seed,
            substream_seed: self.substream_seed,
            state: self.generator.state(),
            substream_index: self.substream_index,
            name: self.name.clone(),
            antithetic: self.antithetic,
            increased_precision: self.increased_precision,
        }
    }

    /// Move this stream to the position recorded in `snapshot`.
    ///
    /// All three seed vectors are checked before anything is changed.
    pub fn restore(&mut self, snapshot: &StreamSnapshot<R>) -> Result<(), InvalidSeed> {
        G::validate(&snapshot.stream_seed)?;
        G::validate(&snapshot.substream_seed)?;
        G::validate(&snapshot.state)?;
        self.stream_seed = snapshot.stream_seed;
        self.substream_seed = snapshot.substream_seed;
        self.generator.load(&snapshot.state);
        self.substream_index = snapshot.substream_index;
        self.name = snapshot.name.clone();
        self.antithetic = snapshot.antithetic;
        self.increased_precision = snapshot.increased_precision;
        Ok(())
    }
}

impl<G: Recurrence<R>, const R: usize> RandomStream for Stream<G, R> {
    fn reset_start_stream(&mut self) {
        Stream::reset_start_stream(self);
    }

    fn reset_start_substream(&mut self) {
        Stream::reset_start_substream(self);
    }

    fn reset_next_substream(&mut self) {
        Stream::reset_next_substream(self);
    }

    fn next_double(&mut self) -> f64 {
        Stream::next_double(self)
    }

    fn next_int(&mut self) -> i32 {
        Stream::next_int(self)
    }
}

impl<G: Recurrence<R>, const R: usize> RngCore for Stream<G, R> {
    fn next_u32(&mut self) -> u32 {
        self.generator.step_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.generator.step_raw());
        let high = u64::from(self.generator.step_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.generator.step_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<G: Recurrence<R>, const R: usize> fmt::Display for Stream<G, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "The state of {name} is : {}", self.state()),
            None => write!(f, "The state of this {} is : {}", G::NAME, self.state()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well607::{Well607, SUBSTREAM_JUMP, WORDS};
    use crate::strategies::legal_seed;
    use proptest::prelude::*;
    use rand::Rng;

    type TestStream = Stream<Well607, WORDS>;
    type Registry = SeedRegistry<Well607, WORDS>;

    fn draws(stream: &mut TestStream, count: usize) -> Vec<u32> {
        (0..count).map(|_| stream.next_u32()).collect()
    }

    #[test]
    fn new_stream_starts_substream_zero_at_registry_seed() {
        let mut registry = Registry::new();
        let expected = registry.current();
        let stream = TestStream::new(&mut registry);
        assert_eq!(stream.stream_seed(), expected);
        assert_eq!(stream.substream_seed(), expected);
        assert_eq!(stream.state(), expected);
        assert_eq!(stream.substream_index(), 0);
    }

    #[test]
    fn reset_start_substream_replays_current_substream() {
        let mut stream = TestStream::new(&mut Registry::new());
        stream.reset_next_substream();
        let first = draws(&mut stream, 50);
        stream.reset_start_substream();
        assert_eq!(draws(&mut stream, 50), first);
        assert_eq!(stream.substream_index(), 1);
    }

    #[test]
    fn reset_next_substream_jumps_by_w() {
        let mut stream = TestStream::new(&mut Registry::new());
        let start = stream.stream_seed();
        stream.reset_next_substream();
        stream.reset_next_substream();
        let once = jump::<Well607, WORDS>(&start, &SUBSTREAM_JUMP);
        let twice = jump::<Well607, WORDS>(&once, &SUBSTREAM_JUMP);
        assert_eq!(stream.substream_seed(), twice);
        assert_eq!(stream.state(), twice);
        assert_eq!(stream.stream_seed(), start);
    }

    #[test]
    fn reset_start_stream_returns_to_substream_zero() {
        let mut stream = TestStream::new(&mut Registry::new());
        let first = draws(&mut stream, 20);
        stream.reset_next_substream();
        draws(&mut stream, 7);
        stream.reset_start_stream();
        stream.reset_start_substream();
        assert_eq!(stream.substream_index(), 0);
        assert_eq!(draws(&mut stream, 20), first);
    }

    #[test]
    fn explicit_seed_is_validated_without_side_effects() {
        let mut stream = TestStream::new(&mut Registry::new());
        let before = stream.snapshot();
        assert_eq!(
            TestStream::from_seed(SeedVector::new([0; WORDS])).unwrap_err(),
            InvalidSeed::AllZero
        );
        assert!(stream.set_seed(SeedVector::new([0; WORDS])).is_err());
        assert_eq!(stream.snapshot(), before);
    }

    #[test]
    fn set_seed_rewinds_to_new_start() {
        let seed = SeedVector::<WORDS>::from_phrase("set-seed");
        let mut stream = TestStream::new(&mut Registry::new());
        stream.reset_next_substream();
        stream.set_seed(seed).unwrap();
        assert_eq!(stream.stream_seed(), seed);
        assert_eq!(stream.substream_seed(), seed);
        assert_eq!(stream.substream_index(), 0);

        let mut fresh = TestStream::from_seed(seed).unwrap();
        assert_eq!(draws(&mut stream, 10), draws(&mut fresh, 10));
    }

    #[test]
    fn clone_does_not_share_state() {
        let mut original = TestStream::new(&mut Registry::new());
        draws(&mut original, 5);
        let mut copy = original.clone();
        let expected = draws(&mut copy, 30);
        assert_eq!(draws(&mut original, 30), expected);

        copy.reset_next_substream();
        assert_ne!(copy.substream_seed(), original.substream_seed());
        assert_eq!(original.substream_index(), 0);
    }

    #[test]
    fn doubles_are_unsigned_scaled_words() {
        let seed = SeedVector::<WORDS>::from_phrase("doubles");
        let mut raw = TestStream::from_seed(seed).unwrap();
        let mut unit = TestStream::from_seed(seed).unwrap();
        for _ in 0..200 {
            let word = raw.next_u32();
            let u = unit.next_double();
            assert!(u > 0.0 && u < 1.0);
            assert_eq!(u, Well607::unit_from_raw(word));
        }
    }

    #[test]
    fn unit_mapping_edges() {
        let norm = 1.0 / 4_294_967_297.0;
        assert_eq!(Well607::unit_from_raw(1), norm);
        assert_eq!(Well607::unit_from_raw(u32::MAX), 4_294_967_295.0 * norm);
        assert_eq!(Well607::unit_from_raw(0), 4_294_967_296.0 * norm);
        assert!(Well607::unit_from_raw(0) < 1.0);
    }

    #[test]
    fn antithetic_mirrors_plain_draws() {
        let mut plain = TestStream::new(&mut Registry::new());
        let mut mirror = plain.clone();
        mirror.set_antithetic(true);
        for _ in 0..100 {
            assert_eq!(mirror.next_double(), 1.0 - plain.next_double());
        }
    }

    #[test]
    fn increased_precision_consumes_two_words() {
        let mut precise = TestStream::new(&mut Registry::new());
        let mut raw = precise.clone();
        precise.set_increased_precision(true);
        let u = precise.next_double();
        assert!((0.0..1.0).contains(&u));
        let first = Well607::unit_from_raw(raw.next_u32());
        let second = Well607::unit_from_raw(raw.next_u32());
        assert_eq!(u, (first + second * INV_TWO_24) % 1.0);
        assert_eq!(precise.state(), raw.state());
    }

    #[test]
    fn bounded_ints_stay_in_range() {
        let mut stream = TestStream::new(&mut Registry::new());
        let values = stream.next_array_of_int(-3..=4, 2_000);
        assert!(values.iter().all(|v| (-3..=4).contains(v)));
        for target in -3..=4 {
            assert!(values.contains(&target), "never drew {target}");
        }
        assert_eq!(stream.next_int_in(7..=7), 7);
        let top = stream.next_int_in(i32::MAX - 1..=i32::MAX);
        assert!(top >= i32::MAX - 1);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn empty_int_range_panics() {
        let mut stream = TestStream::new(&mut Registry::new());
        let (low, high) = (5, 4);
        stream.next_int_in(low..=high);
    }

    #[test]
    fn arrays_follow_generation_order() {
        let mut a = TestStream::new(&mut Registry::new());
        let mut b = a.clone();
        let batch = a.next_array_of_double(25);
        let single: Vec<f64> = (0..25).map(|_| b.next_double()).collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn snapshot_restore_resumes_exactly() {
        let mut stream = TestStream::named(&mut Registry::new(), "checkpointed");
        stream.reset_next_substream();
        stream.set_antithetic(true);
        draws(&mut stream, 33);
        let snapshot = stream.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();

        let expected: Vec<f64> = (0..40).map(|_| stream.next_double()).collect();

        let restored: StreamSnapshot<WORDS> = serde_json::from_str(&json).unwrap();
        let mut resumed = TestStream::from_snapshot(&restored).unwrap();
        let actual: Vec<f64> = (0..40).map(|_| resumed.next_double()).collect();
        assert_eq!(actual, expected);
        assert_eq!(resumed.name(), Some("checkpointed"));
        assert_eq!(resumed.substream_index(), 1);

        // Substream navigation continues from the restored seeds.
        stream.reset_next_substream();
        resumed.reset_next_substream();
        assert_eq!(draws(&mut resumed, 10), draws(&mut stream, 10));
    }

    #[test]
    fn display_uses_name_when_present() {
        let mut registry = Registry::new();
        let anonymous = TestStream::new(&mut registry);
        assert!(anonymous
            .to_string()
            .starts_with("The state of this WELL607 is : {"));
        let named = TestStream::named(&mut registry, "prices");
        let text = named.to_string();
        assert!(text.starts_with("The state of prices is : {"));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn works_as_rand_rng() {
        let mut stream = TestStream::new(&mut Registry::new());
        let mut copy = stream.clone();
        let mut bytes = [0u8; 6];
        stream.fill_bytes(&mut bytes);
        let first = copy.next_u32().to_le_bytes();
        let second = copy.next_u32().to_le_bytes();
        assert_eq!(&bytes[..4], &first);
        assert_eq!(&bytes[4..], &second[..2]);

        let sample: f64 = stream.gen_range(10.0..20.0);
        assert!((10.0..20.0).contains(&sample));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn state_equals_seed_right_after_load(seed in legal_seed()) {
            let stream = TestStream::from_seed(seed).unwrap();
            prop_assert_eq!(stream.state(), seed);
        }

        #[test]
        fn restart_matches_fresh_stream(seed in legal_seed(), skip in 0usize..64) {
            let mut used = TestStream::from_seed(seed).unwrap();
            for _ in 0..skip {
                used.next_u32();
            }
            used.reset_start_stream();
            used.reset_start_substream();
            let mut fresh = TestStream::from_seed(seed).unwrap();
            prop_assert_eq!(used.state(), fresh.state());
            prop_assert_eq!(draws(&mut used, 16), draws(&mut fresh, 16));
        }
    }
}
