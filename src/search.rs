//! Exhaustive search over fixed-size teams drawn from a candidate pool.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::parallel::{batch_bounds, batch_count, WorkerPool};
use crate::team::{accumulate, summarize, ScoredTeam};
use crate::types::SpeciesId;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub const DEFAULT_BATCH_SIZE: u64 = 20_000;

/// `C(n, k)`, or `None` when it does not fit in a `u64`.
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    Some(acc as u64)
}

#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }

    /// Positions the iterator so the next item is the combination with the
    /// given lexicographic rank.
    pub fn starting_at(n: usize, k: usize, rank: u64) -> Option<Self> {
        let total = binomial(n as u64, k as u64)?;
        if rank >= total {
            return None;
        }
        let mut rank = rank;
        let mut indices = Vec::with_capacity(k);
        let mut next = 0usize;
        for slot in 0..k {
            let remaining = (k - slot - 1) as u64;
            loop {
                let with_next = binomial((n - next - 1) as u64, remaining)?;
                if rank < with_next {
                    break;
                }
                rank -= with_next;
                next += 1;
            }
            indices.push(next);
            next += 1;
        }
        Some(Self {
            n,
            indices,
            started: false,
            done: false,
        })
    }

    pub fn advance(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }
        let k = self.indices.len();
        let mut slot = k;
        loop {
            if slot == 0 {
                self.done = true;
                return None;
            }
            slot -= 1;
            if self.indices[slot] < self.n - k + slot {
                break;
            }
        }
        self.indices[slot] += 1;
        for j in slot + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(&self.indices)
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(<[usize]>::to_vec)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub batch_size: u64,
    pub workers: WorkerPool,
    pub cancel: Option<CancelToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: WorkerPool::default(),
            cancel: None,
        }
    }
}

/// Every `size`-member team from `pool` whose worst type total is at least
/// `cutoff`, sorted ascending (best last).
pub fn score_combinations(
    catalog: &Catalog,
    pool: &[SpeciesId],
    size: usize,
    cutoff: i32,
) -> Result<Vec<ScoredTeam>> {
    score_combinations_with(
        catalog,
        pool,
        size,
        cutoff,
        &SearchOptions::default(),
        |_, _| {},
    )
}

/// Like [`score_combinations`], calling `on_progress(done, total)` after
/// each batch and stopping early when `options.cancel` fires.
pub fn score_combinations_with<F>(
    catalog: &Catalog,
    pool: &[SpeciesId],
    size: usize,
    cutoff: i32,
    options: &SearchOptions,
    on_progress: F,
) -> Result<Vec<ScoredTeam>>
where
    F: Fn(u64, u64) + Sync,
{
    let cancelled = || options.cancel.as_ref().is_some_and(CancelToken::is_cancelled);
    if cancelled() {
        return Err(Error::Cancelled);
    }
    if size == 0 {
        return Err(Error::EmptyTeam);
    }
    let ratings = pool
        .iter()
        .map(|id| catalog.rating(*id))
        .collect::<Result<Vec<_>>>()?;
    if size > pool.len() {
        return Ok(Vec::new());
    }
    let too_large = Error::SearchTooLarge {
        pool: pool.len(),
        size,
    };
    let total = binomial(pool.len() as u64, size as u64).ok_or_else(|| too_large.clone())?;
    let batch_size = options.batch_size.max(1);
    let batches = batch_count(total, batch_size);
    tracing::info!(
        pool = pool.len(),
        size,
        cutoff,
        combinations = total,
        batches,
        "scoring combinations"
    );

    let type_count = catalog.type_count();
    let done = AtomicU64::new(0);
    let scan = |mut kept: Vec<ScoredTeam>, index: u64| -> Result<Vec<ScoredTeam>> {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        let (start, end) = batch_bounds(index, total, batch_size);
        let mut combos =
            Combinations::starting_at(pool.len(), size, start).ok_or_else(|| too_large.clone())?;
        let mut totals = vec![0; type_count];
        let before = kept.len();
        for _ in start..end {
            if cancelled() {
                return Err(Error::Cancelled);
            }
            let Some(indices) = combos.advance() else {
                break;
            };
            totals.fill(0);
            for &idx in indices {
                accumulate(&mut totals, ratings[idx]);
            }
            let (min_total, min_count, full_total) = summarize(&totals);
            if min_total >= cutoff {
                kept.push(ScoredTeam {
                    min_total,
                    min_count,
                    full_total,
                    team: indices.iter().map(|&idx| pool[idx]).collect(),
                });
            }
        }
        let finished = done.fetch_add(end - start, Ordering::Relaxed) + (end - start);
        tracing::debug!(start, end, kept = kept.len() - before, "batch scored");
        on_progress(finished, total);
        Ok(kept)
    };

    let merged = options.workers.install(|| {
        (0..batches)
            .into_par_iter()
            .try_fold(Vec::new, scan)
            .try_reduce(Vec::new, |mut left, mut right| {
                left.append(&mut right);
                Ok(left)
            })
    })?;
    let mut results = match merged {
        Ok(results) => results,
        Err(Error::Cancelled) => {
            tracing::warn!(
                scored = done.load(Ordering::Relaxed),
                combinations = total,
                "search cancelled"
            );
            return Err(Error::Cancelled);
        }
        Err(err) => return Err(err),
    };
    results.sort_unstable();
    tracing::info!(kept = results.len(), combinations = total, "search finished");
    Ok(results)
}
