//! Injectable randomness
//!
//! Simulations never touch a global RNG. Production code uses a seeded PCG
//! stream; tests can script the exact outcome of every draw.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the random draws a simulation makes
pub trait RandomSource {
    /// Bernoulli draw: true with probability `p`
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform integer in `0..bound` (0 when `bound` is 0)
    fn below(&mut self, bound: u32) -> u32;
}

/// Seeded PCG stream, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self, p: f64) -> bool {
        // Also rejects NaN
        if !(p > 0.0) {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.random_bool(p)
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// Replays scripted outcomes in order.
///
/// Once a script runs dry, `chance` answers `false` and `below` answers 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    values: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chances(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(outcomes);
        self
    }

    pub fn with_values(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.values.extend(values);
        self
    }

    /// Number of scripted `chance` outcomes not yet consumed
    pub fn chances_left(&self) -> usize {
        self.chances.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn below(&mut self, bound: u32) -> u32 {
        match (self.values.pop_front(), bound) {
            (_, 0) | (None, _) => 0,
            (Some(v), b) => v % b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.chance(0.3), b.chance(0.3));
            assert_eq!(a.below(50), b.below(50));
        }
    }

    #[test]
    fn test_degenerate_probabilities() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..20 {
            assert!(!rng.chance(0.0));
            assert!(!rng.chance(-1.0));
            assert!(!rng.chance(f64::NAN));
            assert!(rng.chance(1.0));
            assert_eq!(rng.below(0), 0);
            assert!(rng.below(3) < 3);
        }
    }

    #[test]
    fn test_script_replays_then_defaults() {
        let mut rng = ScriptedRandom::new()
            .with_chances([true, false, true])
            .with_values([7, 120]);
        assert!(rng.chance(0.01));
        assert!(!rng.chance(0.99));
        assert_eq!(rng.chances_left(), 1);
        assert!(rng.chance(0.5));
        assert!(!rng.chance(1.0));

        assert_eq!(rng.below(50), 7);
        assert_eq!(rng.below(50), 20);
        assert_eq!(rng.below(50), 0);
    }
}
