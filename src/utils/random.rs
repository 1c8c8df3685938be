use std::sync::Mutex;

use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Source of randomness for sampled selection.
///
/// Hybrid selection draws through this trait so tests can pin the outcome
/// with `SeededRandom` while production uses a fresh generator per call.
pub trait RandomSource: Send + Sync {
    /// Draw `amount` distinct indices from `0..len` without replacement.
    /// Order is unspecified. `amount` larger than `len` is clamped.
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize>;
}

/// Unseeded generator, a fresh `thread_rng` handle per call
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        if amount == 0 {
            return Vec::new();
        }
        index::sample(&mut rand::thread_rng(), len, amount).into_vec()
    }
}

/// Reproducible generator seeded once at construction
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
    fn sample_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        if amount == 0 {
            return Vec::new();
        }
        // a poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        index::sample(&mut *rng, len, amount).into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn samples_are_distinct_and_in_range() {
        let rng = ThreadRandom;
        for _ in 0..50 {
            let picked = rng.sample_indices(15, 5);
            assert_eq!(picked.len(), 5);
            let set: HashSet<usize> = picked.iter().copied().collect();
            assert_eq!(set.len(), 5);
            assert!(picked.iter().all(|&i| i < 15));
        }
    }

    #[test]
    fn amount_is_clamped_to_len() {
        assert_eq!(ThreadRandom.sample_indices(3, 10).len(), 3);
        assert!(ThreadRandom.sample_indices(0, 4).is_empty());
        assert!(SeededRandom::new(1).sample_indices(5, 0).is_empty());
    }

    #[test]
    fn same_seed_same_draws() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        for _ in 0..10 {
            assert_eq!(a.sample_indices(20, 4), b.sample_indices(20, 4));
        }
    }
}
