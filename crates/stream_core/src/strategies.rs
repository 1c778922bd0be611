//! `proptest` strategies for seeds.

use proptest::prelude::*;

use crate::seed::{validate, SeedVector};
use crate::well607::WORDS;

/// Any legal WELL607 seed.
pub fn legal_seed() -> impl Strategy<Value = SeedVector<WORDS>> {
    proptest::array::uniform19(any::<u32>())
        .prop_map(SeedVector::new)
        .prop_filter("seed must be legal", |seed| validate(seed).is_ok())
}

/// A seed with every word zero except possibly the last one.
pub fn sparse_seed() -> impl Strategy<Value = SeedVector<WORDS>> {
    any::<u32>().prop_map(|last| {
        let mut words = [0u32; WORDS];
        words[WORDS - 1] = last;
        SeedVector::new(words)
    })
}
