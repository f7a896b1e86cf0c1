//! Seeded RNG for a single job.
//!
//! The configured seed is applied exactly once, when the job's `SeededRng` is
//! built, and the generator is passed explicitly to whatever needs it. There
//! is no process-wide generator. The signal computation itself draws nothing;
//! any extension that needs randomness draws from this instance so that two
//! runs with the same input and seed stay bit-identical.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: i64,
    rng: StdRng,
}

impl SeededRng {
    /// Seed a generator. Any `i64` is accepted; negative seeds map to
    /// distinct 64-bit states by two's-complement reinterpretation.
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed as u64),
        }
    }

    /// The seed this generator was built from.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
