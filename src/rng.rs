//! Injectable randomness for checkpoint ids and background flavor text.
//!
//! All randomness in the sequencer is cosmetic. Routing it through a trait
//! keeps every test deterministic: production code draws from entropy, tests
//! construct a seeded source and get the same sequence every run.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Source of the few random draws the sequencer makes.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Index into a collection of `len` elements. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Integer in the inclusive range `[lo, hi]`.
    fn int_in(&mut self, lo: u32, hi: u32) -> u32;
}

/// Default source backed by `rand::StdRng`.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Entropy-seeded source for production use.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn int_in(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }
}
