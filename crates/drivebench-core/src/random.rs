//! Random sources behind the simulator's progress steps, outcomes and ids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Produces uniform samples in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible randomness from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen::<f64>()
    }
}

/// Replays a fixed list of samples, then repeats `fallback` forever.
///
/// Samples are clamped into `[0, 1)`.
#[derive(Debug)]
pub struct ScriptedRandom {
    values: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: Mutex::new(values.into_iter().map(clamp_unit).collect()),
            fallback: clamp_unit(fallback),
        }
    }

    /// Always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([], value)
    }

    /// Samples not yet consumed from the script.
    pub fn remaining(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> f64 {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0 - f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_values_then_fallback() {
        let random = ScriptedRandom::new([0.1, 0.2], 0.7);
        assert_eq!(random.next_unit(), 0.1);
        assert_eq!(random.remaining(), 1);
        assert_eq!(random.next_unit(), 0.2);
        assert_eq!(random.next_unit(), 0.7);
        assert_eq!(random.next_unit(), 0.7);
    }

    #[test]
    fn scripted_values_stay_below_one() {
        let random = ScriptedRandom::new([1.5, -3.0], 1.0);
        assert!(random.next_unit() < 1.0);
        assert_eq!(random.next_unit(), 0.0);
        assert!(random.next_unit() < 1.0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        for _ in 0..16 {
            let sample = a.next_unit();
            assert_eq!(sample, b.next_unit());
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn thread_random_in_unit_range() {
        for _ in 0..64 {
            assert!((0.0..1.0).contains(&ThreadRandom.next_unit()));
        }
    }
}
