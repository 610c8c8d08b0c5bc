//! Seeded random source for level generation
//!
//! Wraps `Pcg32` so the seed travels with the generator. Implements `RngCore`,
//! so anything generic over `rand::Rng` accepts it.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Explicitly threaded, seedable PRNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSource {
    seed: u64,
    rng: Pcg32,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created (or last reset) with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from a new seed
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
