//! Parallel utilities for recursive bisection.
//!
//! This module provides deterministic seeding of per-subset random number
//! generators and the fork-join used to descend sibling subtrees, so parallel and
//! serial runs produce identical labelings.

use ahash::RandomState;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hash::{BuildHasher, Hasher};

/// Fixed hasher keys; `AHasher::default()` keys are random per process.
const SEED_KEYS: RandomState = RandomState::with_seeds(
    0x9e37_79b9_7f4a_7c15,
    0xbf58_476d_1ce4_e5b9,
    0x94d0_49bb_1331_11eb,
    0x2545_f491_4f6c_dd1d,
);

/// Derives a seed from the global seed, the attempt number and the subset's vertex ids.
///
/// The same subset bisected under the same configuration always draws the same
/// random stream, wherever in the thread pool it runs and in every process.
pub fn subset_seed(global_seed: u64, attempt: u32, subset: &[usize]) -> u64 {
    let mut hasher = SEED_KEYS.build_hasher();
    hasher.write_u64(global_seed);
    hasher.write_u32(attempt);
    hasher.write_usize(subset.len());
    for &v in subset {
        hasher.write_usize(v);
    }
    hasher.finish()
}

/// A `SmallRng` seeded by [`subset_seed`].
pub fn subset_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Runs `a` and `b`, on the rayon pool when `parallel` is set, otherwise in order.
pub fn fork_join<A, B, RA, RB>(parallel: bool, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    if parallel {
        rayon::join(a, b)
    } else {
        (a(), b())
    }
}
