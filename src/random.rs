//! Deterministic random source.
//!
//! Every avatar is a pure function of its seed, so all randomness used while
//! building one must come from a generator that can be re-seeded from that
//! seed. [`RandomSource`] wraps a ChaCha8 stream cipher RNG:
//!
//! - [`seed`](RandomSource::seed) hashes the seed string with SHA-256 and uses
//!   the digest as the 256-bit ChaCha key, so the same string always replays
//!   the same sequence of draws on every platform.
//! - [`get`](RandomSource::get) draws a bounded integer.
//! - [`reset`](RandomSource::reset) re-keys the RNG from OS entropy, so code
//!   that draws after a build cannot predict anything from the last seed.
//!
//! The source is owned by a generator instance and passed by `&mut` into the
//! pipeline hooks; nothing here touches process-global RNG state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Seedable random source with explicit seed/reset lifecycle.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seeded: bool,
}

impl RandomSource {
    /// Create an unseeded (entropy-backed) source.
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seeded: false,
        }
    }

    /// Re-initialize the source deterministically from `value`.
    pub fn seed(&mut self, value: &str) {
        let digest: [u8; 32] = Sha256::digest(value.as_bytes()).into();
        self.rng = ChaCha8Rng::from_seed(digest);
        self.seeded = true;
    }

    /// Draw an integer from the inclusive range `[min, max]`.
    ///
    /// `min > max` is a caller bug and panics.
    pub fn get(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// Draw an index into a non-empty slice of length `len`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Discard the deterministic state.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::from_entropy();
        self.seeded = false;
    }

    /// Whether the source currently replays a seeded sequence.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}
