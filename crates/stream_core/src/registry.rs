//! The "next package seed" from which new streams are cut.
//!
//! Each hand-out copies the current seed and then moves the registry one
//! stream distance ahead, so consecutive streams start `Z` steps apart and
//! never overlap. The registry is an ordinary value: callers own it and pass
//! it to stream construction, and tests can use private fixtures.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::InvalidSeed;
use crate::jump::jump;
use crate::recurrence::Recurrence;
use crate::seed::SeedVector;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedRegistry<G, const R: usize> {
    next: SeedVector<R>,
    issued: u64,
    family: PhantomData<G>,
}

impl<G: Recurrence<R>, const R: usize> SeedRegistry<G, R> {
    /// A registry positioned at the family's default package seed.
    pub fn new() -> Self {
        Self {
            next: G::DEFAULT_PACKAGE_SEED,
            issued: 0,
            family: PhantomData,
        }
    }

    /// A registry positioned at a caller-chosen package seed.
    pub fn with_seed(seed: SeedVector<R>) -> Result<Self, InvalidSeed> {
        G::validate(&seed)?;
        Ok(Self {
            next: seed,
            issued: 0,
            family: PhantomData,
        })
    }

    /// The seed the next stream will start from.
    pub fn current(&self) -> SeedVector<R> {
        self.next
    }

    /// Number of stream seeds handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Hand out the current seed and advance by one stream distance.
    pub fn take_and_advance(&mut self) -> SeedVector<R> {
        let taken = self.next;
        self.next = jump::<G, R>(&taken, &G::STREAM_JUMP);
        self.issued += 1;
        debug!(family = G::NAME, issued = self.issued, "issued stream seed");
        taken
    }

    /// Replace the next package seed. Existing streams are unaffected.
    pub fn set_package_seed(&mut self, seed: SeedVector<R>) -> Result<(), InvalidSeed> {
        G::validate(&seed)?;
        self.next = seed;
        debug!(family = G::NAME, seed = %seed, "package seed replaced");
        Ok(())
    }
}

impl<G: Recurrence<R>, const R: usize> Default for SeedRegistry<G, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registry handle that can be shared between threads.
///
/// The read, jump and store of a hand-out happen under one lock, so
/// concurrent constructions still receive non-overlapping seeds.
#[derive(Debug)]
pub struct SharedSeedRegistry<G, const R: usize> {
    inner: Arc<Mutex<SeedRegistry<G, R>>>,
}

impl<G, const R: usize> Clone for SharedSeedRegistry<G, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: Recurrence<R>, const R: usize> SharedSeedRegistry<G, R> {
    pub fn new(registry: SeedRegistry<G, R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `f` with exclusive access to the registry. A poisoned lock is reclaimed.
    pub fn with<T>(&self, f: impl FnOnce(&mut SeedRegistry<G, R>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn take_and_advance(&self) -> SeedVector<R> {
        self.with(SeedRegistry::take_and_advance)
    }

    pub fn set_package_seed(&self, seed: SeedVector<R>) -> Result<(), InvalidSeed> {
        self.with(|registry| registry.set_package_seed(seed))
    }

    pub fn current(&self) -> SeedVector<R> {
        self.with(|registry| registry.current())
    }
}

impl<G: Recurrence<R>, const R: usize> Default for SharedSeedRegistry<G, R> {
    fn default() -> Self {
        Self::new(SeedRegistry::new())
    }
}
