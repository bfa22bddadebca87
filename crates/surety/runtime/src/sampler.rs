//! Deterministic index sampling
//!
//! All bucket draws — the three indexes assigned to a new oracle and the
//! request index opening a consensus round — come from one injected RNG.
//! Seeding it makes every assignment and every round reproducible in tests.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of index-bucket draws.
pub struct IndexSampler {
    rng: StdRng,
    draws: u64,
}

impl IndexSampler {
    /// Deterministic sampler for tests and replay.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// OS-entropy sampler for production use.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            draws: 0,
        }
    }

    /// Draw one bucket id from `0..space`.
    pub fn draw(&mut self, space: u8) -> u8 {
        self.draws += 1;
        self.rng.gen_range(0..space)
    }

    /// Draw an oracle's three buckets. Repeats are allowed: an oracle may
    /// hold the same bucket more than once.
    pub fn draw_triple(&mut self, space: u8) -> [u8; 3] {
        [self.draw(space), self.draw(space), self.draw(space)]
    }

    /// Number of draws made so far (the assignment nonce).
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
