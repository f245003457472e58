//! Deterministic random number generation for autoplay sessions.
//!
//! RULE: Nothing in the core may call any platform RNG.
//! All randomness flows through SessionRng streams derived from one
//! session seed, one stream per decision kind, so adding a new kind of
//! decision never shifts the existing streams.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

pub struct SessionRng {
    inner: Pcg64Mcg,
}

impl SessionRng {
    /// Derive a stream from the session seed and a stable stream index.
    pub fn new(seed: u64, stream_index: u64) -> Self {
        let derived_seed = seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Clicks = 0,
    Upgrades = 1,
}

impl StreamSlot {
    pub fn stream(self, seed: u64) -> SessionRng {
        SessionRng::new(seed, self as u64)
    }
}
