//! Sampling helpers used by growth, leaves and wind.
//!
//! All of them take the random source explicitly so that a seeded
//! generator reproduces a tree exactly.

use rand::Rng;

/// Uniform sample in `[-width / 2, width / 2]`.
pub fn symmetric(rng: &mut impl Rng, width: f32) -> f32 {
    let half = 0.5 * width.abs();
    rng.random_range(-half..=half)
}

/// Uniform sample in `[lo, hi]`.
pub fn between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    rng.random_range(lo..=hi)
}

/// Uniform sample in `[0, max]`.
pub fn under(rng: &mut impl Rng, max: f32) -> f32 {
    rng.random_range(0.0..=max.abs())
}

/// Returns `true` with probability `p` (clamped to `[0, 1]`).
pub fn chance(rng: &mut impl Rng, p: f32) -> bool {
    rng.random_bool(f64::from(p.clamp(0.0, 1.0)))
}
