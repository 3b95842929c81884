//! Pseudorandom sources for reproducible shuffling
//!
//! The permutation produced by [`shuffle`] depends only on the stream of
//! `u64` values drawn from the generator, so any two implementations that
//! agree on that stream agree on every fold assignment:
//!
//! - Fisher–Yates from the back: for `i` in `(1..n).rev()`, draw
//!   `j = rng.index_below(i + 1)` and swap positions `i` and `j`.
//! - `index_below(bound)` draws `next_u64()` until the value is at most
//!   `u64::MAX - ((u64::MAX % bound) + 1) % bound`, then returns
//!   `value % bound`.
//!
//! The default generator for a seed is `ChaCha8Rng::seed_from_u64(seed)`.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when a job does not specify one
pub const DEFAULT_SEED: u64 = 42;

/// A source of uniformly distributed 64-bit values
pub trait ShuffleRng {
    /// Draw the next raw value
    fn next_u64(&mut self) -> u64;

    /// Draw an unbiased index in `0..bound` by rejection sampling.
    ///
    /// `bound` must be non-zero.
    #[allow(clippy::cast_possible_truncation)]
    fn index_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "index_below requires a non-zero bound");
        let bound = bound as u64;
        let zone = u64::MAX - ((u64::MAX % bound) + 1) % bound;
        loop {
            let value = self.next_u64();
            if value <= zone {
                return (value % bound) as usize;
            }
        }
    }
}

impl<R: RngCore + ?Sized> ShuffleRng for R {
    fn next_u64(&mut self) -> u64 {
        RngCore::next_u64(self)
    }
}

/// The default generator for `seed`
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Permute `items` in place with Fisher–Yates
pub fn shuffle<T, R: ShuffleRng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index_below(i + 1);
        items.swap(i, j);
    }
}
