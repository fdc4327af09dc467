use crate::error::{Error, Result};
use rayon::ThreadPoolBuilder;

/// Number of `batch_size` slices needed to cover `total` combinations.
pub fn batch_count(total: u64, batch_size: u64) -> u64 {
    total.div_ceil(batch_size.max(1))
}

/// Rank range `[start, end)` of batch `index`; only the last batch is short.
pub fn batch_bounds(index: u64, total: u64, batch_size: u64) -> (u64, u64) {
    let batch_size = batch_size.max(1);
    let start = index.saturating_mul(batch_size).min(total);
    (start, start.saturating_add(batch_size).min(total))
}

/// How many rayon threads a search may use.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// 0 means the global rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    pub fn install<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| Error::WorkerPool(err.to_string()))?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_tile_the_rank_space() {
        let (total, size) = (35, 4);
        let count = batch_count(total, size);
        assert_eq!(count, 9);
        let bounds: Vec<_> = (0..count).map(|i| batch_bounds(i, total, size)).collect();
        assert_eq!(bounds[0], (0, 4));
        assert_eq!(bounds[8], (32, 35));
        assert!(bounds.windows(2).all(|w| w[0].1 == w[1].0));
    }

    #[test]
    fn huge_index_space_needs_no_table() {
        let total = 19_341_305_238_724;
        let count = batch_count(total, 20_000);
        assert_eq!(count, 967_065_262);
        assert_eq!(batch_bounds(count - 1, total, 20_000), (19_341_305_220_000, total));
        assert_eq!(batch_bounds(count, total, 20_000), (total, total));
    }

    #[test]
    fn zero_batch_size_is_treated_as_one() {
        assert_eq!(batch_count(3, 0), 3);
        assert_eq!(batch_bounds(2, 3, 0), (2, 3));
        assert_eq!(batch_count(0, 10), 0);
    }

    #[test]
    fn fixed_worker_pool_runs_closure() {
        let pool = WorkerPool::with_workers(2);
        assert_eq!(pool.install(rayon::current_num_threads).unwrap(), 2);
    }
}
