use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for batch sampling. Shared across requests, so
/// implementations take `&self` and synchronize internally.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, n)`. `n` must be positive.
    fn int_n(&self, n: usize) -> usize;

    /// Permutes `n` positions by calling `swap(i, j)`.
    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize));
}

/// Shuffles a slice in place through a [`RandomSource`].
pub fn shuffle_slice<T>(rng: &dyn RandomSource, items: &mut [T]) {
    let len = items.len();
    rng.shuffle(len, &mut |i, j| items.swap(i, j));
}

pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn int_n(&self, n: usize) -> usize {
        self.rng.lock().random_range(0..n)
    }

    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize)) {
        if n < 2 {
            return;
        }
        let mut rng = self.rng.lock();
        for i in (1..n).rev() {
            let j = rng.random_range(0..=i);
            swap(i, j);
        }
    }
}
