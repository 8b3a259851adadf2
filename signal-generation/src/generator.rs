// Batch Generators
// Synthesizes batches of market records from fixed vocabularies

use chrono::Duration;
use std::ops::RangeInclusive;
use std::sync::Mutex;

/// Produces a fresh batch of records on every call
///
/// Implementations are free to return a different batch each time; nothing
/// about the output is deterministic unless the implementation says so.
pub trait BatchGenerator: Send + Sync {
    type Record;

    fn generate_batch(&self) -> Vec<Self::Record>;

    fn name(&self) -> &'static str;
}

/// Uniform pseudo-random source shared behind `&self`
///
/// Wraps a `fastrand::Rng` so generators can be seeded in tests and still be
/// `Send + Sync`.
#[derive(Debug)]
pub struct Sampler {
    rng: Mutex<fastrand::Rng>,
}

impl Sampler {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut fastrand::Rng) -> R) -> R {
        // A panic while holding the lock cannot leave the rng in a bad state
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Uniform float in `[low, high)`
    pub fn uniform(&self, low: f64, high: f64) -> f64 {
        self.with(|rng| low + rng.f64() * (high - low))
    }

    pub fn chance(&self, probability: f64) -> bool {
        self.with(|rng| rng.f64() < probability)
    }

    pub fn int(&self, range: RangeInclusive<u8>) -> u8 {
        self.with(|rng| rng.u8(range))
    }

    /// Pick one element uniformly. `items` must not be empty.
    pub fn pick<T: Copy>(&self, items: &[T]) -> T {
        let index = self.with(|rng| rng.usize(..items.len()));
        items[index]
    }

    /// Between `min` and `max` distinct elements, drawn without replacement
    pub fn subset<T: Copy>(&self, items: &[T], min: usize, max: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        self.with(|rng| {
            rng.shuffle(&mut pool);
            let count = rng.usize(min..=max).min(pool.len());
            pool.truncate(count);
        });
        pool
    }

    /// Random age between zero and `max_secs`
    pub fn age(&self, max_secs: i64) -> Duration {
        Duration::seconds(self.with(|rng| rng.i64(0..=max_secs)))
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let a = Sampler::seeded(7);
        let b = Sampler::seeded(7);
        let xs: Vec<u8> = (0..16).map(|_| a.int(0..=100)).collect();
        let ys: Vec<u8> = (0..16).map(|_| b.int(0..=100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_uniform_bounds() {
        let sampler = Sampler::new();
        for _ in 0..1000 {
            let x = sampler.uniform(-0.05, 0.05);
            assert!((-0.05..0.05).contains(&x));
        }
    }

    #[test]
    fn test_subset_is_distinct() {
        let sampler = Sampler::new();
        let items = [1, 2, 3, 4, 5, 6, 7, 8];
        for _ in 0..200 {
            let mut picked = sampler.subset(&items, 2, 4);
            assert!((2..=4).contains(&picked.len()));
            picked.sort_unstable();
            picked.dedup();
            assert!((2..=4).contains(&picked.len()));
        }
    }
}
