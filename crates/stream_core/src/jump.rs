//! Jump-ahead by a fixed distance in time linear in the state size.
//!
//! For a table `t(z) = z^d mod P(z)` the state `d` steps ahead of `x` is
//! `t(A) x`, where `A` is the transition matrix. Expanding `t(A) x` as
//! `sum_j t_j A^j x` only needs the states the recurrence visits anyway, so
//! the operator walks the generator `32R` steps and XOR-accumulates the
//! snapshot wherever the table has a set coefficient.

use tracing::trace;

use crate::recurrence::Recurrence;
use crate::seed::{JumpTable, SeedVector};

/// Return the seed `d` steps after `seed`, where `table` encodes `z^d mod P(z)`.
pub fn jump<G, const R: usize>(seed: &SeedVector<R>, table: &JumpTable<R>) -> SeedVector<R>
where
    G: Recurrence<R>,
{
    let mut generator = G::from_seed(seed);
    let mut accumulated = [0u32; R];
    for index in 0..R * 32 {
        if table.bit(index) {
            let state = generator.state();
            for (acc, word) in accumulated.iter_mut().zip(state.words()) {
                *acc ^= *word;
            }
        }
        generator.step_raw();
    }
    trace!(family = G::NAME, "jumped seed ahead");
    SeedVector::new(accumulated)
}
