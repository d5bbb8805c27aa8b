//! Simulated tank level probe.
//!
//! The board has no physical level sensor: each measurement draws a
//! reading uniformly from `[-1, 1]`, which the level register then folds
//! into the stored value.
//!
//! ## Dual-target design
//!
//! The uniform sampler uses `rand`'s `StdRng` on both targets (seeded from
//! the OS entropy source, which is the hardware RNG on ESP-IDF).  Tests
//! and replays use [`ScriptedSampler`] for deterministic readings.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest simulated reading.
pub const READING_MIN: f32 = -1.0;
/// Highest simulated reading.
pub const READING_MAX: f32 = 1.0;

/// Source of raw level readings.
pub trait LevelSampler {
    /// Produce one reading.
    fn sample(&mut self) -> f32;
}

impl<T: LevelSampler + ?Sized> LevelSampler for Box<T> {
    fn sample(&mut self) -> f32 {
        (**self).sample()
    }
}

// ---------------------------------------------------------------------------
// Uniform random sampler
// ---------------------------------------------------------------------------

/// Uniform readings in `[READING_MIN, READING_MAX]`.
pub struct UniformSampler {
    rng: StdRng,
}

impl UniformSampler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for simulations.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LevelSampler for UniformSampler {
    fn sample(&mut self) -> f32 {
        self.rng.gen_range(READING_MIN..=READING_MAX)
    }
}

// ---------------------------------------------------------------------------
// Scripted sampler
// ---------------------------------------------------------------------------

/// Replays a fixed list of readings, then repeats `fallback` forever.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    readings: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedSampler {
    pub fn new(readings: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            fallback,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new([], value)
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl LevelSampler for ScriptedSampler {
    fn sample(&mut self) -> f32 {
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_range() {
        let mut s = UniformSampler::seeded(7);
        for _ in 0..1000 {
            let v = s.sample();
            assert!((READING_MIN..=READING_MAX).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn seeded_sampler_is_reproducible() {
        let mut a = UniformSampler::seeded(42);
        let mut b = UniformSampler::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.sample().to_bits(), b.sample().to_bits());
        }
    }

    #[test]
    fn scripted_replays_then_falls_back() {
        let mut s = ScriptedSampler::new([0.5, -0.25], 0.0);
        assert_eq!(s.remaining(), 2);
        assert!((s.sample() - 0.5).abs() < f32::EPSILON);
        assert!((s.sample() + 0.25).abs() < f32::EPSILON);
        assert_eq!(s.remaining(), 0);
        assert!(s.sample().abs() < f32::EPSILON);
        assert!(s.sample().abs() < f32::EPSILON);
    }
}
