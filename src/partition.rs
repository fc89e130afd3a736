use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How the global rows are split between workers.
///
/// Every worker receives `rows / workers` rows and the first `rows % workers` workers
/// receive one more, so the plan is fully determined by its two inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPlan {
    counts: Vec<usize>,
    offsets: Vec<usize>,
}

impl PartitionPlan {
    pub fn new(rows: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::config("at least one worker is required"));
        }
        if workers > rows {
            return Err(Error::config(format!(
                "{} workers cannot share {} rows",
                workers, rows
            )));
        }
        let share = rows / workers;
        let remainder = rows % workers;
        let counts: Vec<usize> = (0..workers)
            .map(|rank| share + usize::from(rank < remainder))
            .collect();
        let offsets = counts
            .iter()
            .scan(0, |next, &count| {
                let first = *next;
                *next += count;
                Some(first)
            })
            .collect();
        Ok(Self { counts, offsets })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.counts.len()
    }

    pub fn total_rows(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn row_counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of rows owned by `rank`. Panics if `rank` is not part of the plan.
    #[inline]
    pub fn rows_of(&self, rank: usize) -> usize {
        self.counts[rank]
    }

    /// Global index of the first row owned by `rank`. Panics if `rank` is not part of the plan.
    #[inline]
    pub fn first_row(&self, rank: usize) -> usize {
        self.offsets[rank]
    }

    /// The worker owning `global_row` and the row's index within that worker's interior.
    pub fn owner_of(&self, global_row: usize) -> Option<(usize, usize)> {
        if global_row >= self.total_rows() {
            return None;
        }
        let rank = match self.offsets.binary_search(&global_row) {
            Ok(rank) => rank,
            Err(insert) => insert - 1,
        };
        Some((rank, global_row - self.offsets[rank]))
    }

    /// The ring predecessor of `rank`.
    #[inline]
    pub fn prev(&self, rank: usize) -> usize {
        (rank + self.workers() - 1) % self.workers()
    }

    /// The ring successor of `rank`.
    #[inline]
    pub fn next(&self, rank: usize) -> usize {
        (rank + 1) % self.workers()
    }
}
