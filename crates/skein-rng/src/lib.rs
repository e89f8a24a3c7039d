//! Deterministic seeded sampling for Skein simulations.
//!
//! [`SimRng`] wraps a ChaCha8 stream and derives every sample kind the
//! engine needs — uniforms, ranged floats, bounded integers, Gaussians,
//! unit vectors — from raw generator words using fixed published
//! constants. Given the same seed and the same call sequence, every
//! operation returns identical bits across runs.
//!
//! The generator itself is ChaCha8 seeded via `seed_from_u64`, the
//! same determinism contract the rest of the workspace tests against.
//! Derived samples deliberately avoid `rand`'s distribution machinery
//! so the mapping from generator words to values is part of this
//! crate's own contract:
//!
//! - `f32` uniforms use the top 24 bits of one `u32` word: `(w >> 8) · 2⁻²⁴`
//! - `f64` uniforms use the top 53 bits of one `u64` word: `(w >> 11) · 2⁻⁵³`
//! - bounded integers use multiply-shift: `(w · n) >> 32`
//! - Gaussians use the Box–Muller transform (cosine branch, two draws)
//! - unit vectors use a single angle draw: `θ = 2π·u`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `2⁻²⁴`, the f32 uniform scale for 24 mantissa bits.
const F32_SCALE: f32 = 1.0 / (1u32 << 24) as f32;
/// `2⁻⁵³`, the f64 uniform scale for 53 mantissa bits.
const F64_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// A deterministic, seed-initialized sample stream.
///
/// One `SimRng` lives inside each world; stages never construct their
/// own. Cloning yields an independent stream that will replay the
/// clone point identically, which the determinism tests rely on.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    /// Create a stream from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Next raw 32-bit generator word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Next raw 64-bit generator word.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform `f32` in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * F32_SCALE
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * F64_SCALE
    }

    /// Uniform `f32` in `[lo, hi)`.
    ///
    /// `lo > hi` is a caller error; the result is then meaningless but
    /// still deterministic.
    #[inline]
    pub fn next_f32_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Uniform integer in `[0, n)` via multiply-shift.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero or exceeds `u32::MAX`.
    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        assert!(n > 0, "next_index requires n > 0");
        let n = u32::try_from(n).expect("next_index requires n <= u32::MAX");
        ((self.next_u32() as u64 * n as u64) >> 32) as usize
    }

    /// Fair coin flip from the top bit of one word.
    #[inline]
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }

    /// Standard normal sample via the Box–Muller transform.
    ///
    /// Consumes exactly two `u64` draws and returns the cosine branch
    /// only; no second value is cached, so the draw count per call is
    /// structurally fixed.
    pub fn next_gaussian(&mut self) -> f32 {
        let u1: f64 = self.next_f64().max(1e-300); // avoid ln(0)
        let u2: f64 = self.next_f64();
        ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
    }

    /// Uniform direction on the unit circle, from a single angle draw.
    pub fn next_unit_vector(&mut self) -> (f32, f32) {
        let theta = std::f32::consts::TAU * self.next_f32();
        (theta.cos(), theta.sin())
    }
}
