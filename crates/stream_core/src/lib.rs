//! Reproducible, jump-ahead random streams for Monte-Carlo simulation.
//!
//! One package seed fans out into many non-overlapping [`Stream`]s, each of
//! which splits further into substreams. Re-running with the same package
//! seed and the same sequence of stream constructions reproduces every draw.
//!
//! ```
//! use stream_core::{Well607Registry, Well607Stream};
//!
//! let mut registry = Well607Registry::new();
//! let mut paths = Well607Stream::named(&mut registry, "paths");
//! let first = paths.next_double();
//! paths.reset_start_stream();
//! assert_eq!(paths.next_double(), first);
//! ```

pub mod error;
pub mod gf2;
pub mod io;
pub mod jump;
pub mod random;
pub mod recurrence;
pub mod registry;
pub mod seed;
pub mod stream;
#[cfg(any(test, feature = "proptest-support"))]
pub mod strategies;
pub mod well607;

pub use error::InvalidSeed;
pub use jump::jump;
pub use random::RandomStream;
pub use recurrence::Recurrence;
pub use registry::{SeedRegistry, SharedSeedRegistry};
pub use seed::{validate, JumpTable, SeedVector};
pub use stream::{Stream, StreamSnapshot};
pub use well607::Well607;

pub type Well607Registry = SeedRegistry<Well607, { well607::WORDS }>;
pub type Well607SharedRegistry = SharedSeedRegistry<Well607, { well607::WORDS }>;
pub type Well607Stream = Stream<Well607, { well607::WORDS }>;
