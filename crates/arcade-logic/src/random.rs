//! Seeded pseudo-random number generator
//!
//! xorshift64* behind `rand::RngCore`, so opponents can be driven either by
//! any `rand` generator or by a reproducible seed handed over from the
//! browser.

use rand::RngCore;

const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x517cc1b727220a95;
        if state == 0 {
            state = GOLDEN_GAMMA;
        }

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.step();
        }
        rng
    }

    fn step(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
