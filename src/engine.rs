use crate::random::{stream_key, RandomSource};
use crate::{Cell, Error, LocalGrid, NeighborCounts, Result, Rule};
use ndarray::{s, ArrayView2, ArrayViewMut1, Zip};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Computes the next generation of a worker's interior.
///
/// The pass reads only from the current buffer and writes only interior cells of the next
/// one, so rows can be evaluated in any order. With more than one thread the interior rows
/// are split into contiguous chunks on a private rayon pool.
pub struct UpdateEngine {
    rule: Rule,
    pool: Option<ThreadPool>,
}

impl UpdateEngine {
    pub fn new(rule: Rule, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::config("at least one thread per worker is required"));
        }
        let pool = if threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::config(format!("could not start update pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { rule, pool })
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or(1, ThreadPool::current_num_threads)
    }

    /// Write generation `generation + 1` into the next buffer of `grid`.
    ///
    /// The halo of the current buffer must already be populated. Interior row `r` draws from
    /// `source.stream(stream_key(generation, first_row + r))`.
    pub fn update<R>(&self, grid: &mut LocalGrid, source: &R, generation: u64)
    where
        R: RandomSource + Sync,
    {
        let rule = self.rule;
        let first_row = grid.first_row();
        let (current, mut next) = grid.buffers();
        let mut interior = next.slice_mut(s![1..-1, ..]);
        let zip = Zip::indexed(interior.rows_mut());
        match &self.pool {
            Some(pool) => pool.install(|| {
                zip.par_for_each(|r, out| {
                    let mut rng = source.stream(stream_key(generation, first_row + r));
                    update_row(&rule, &current, r + 1, out, &mut rng);
                })
            }),
            None => zip.for_each(|r, out| {
                let mut rng = source.stream(stream_key(generation, first_row + r));
                update_row(&rule, &current, r + 1, out, &mut rng);
            }),
        }
    }
}

#[inline]
fn update_row<R: RandomSource>(
    rule: &Rule,
    current: &ArrayView2<'_, Cell>,
    row: usize,
    mut out: ArrayViewMut1<'_, Cell>,
    rng: &mut R,
) {
    let cols = current.ncols() - 2;
    for col in 1..=cols {
        let counts = NeighborCounts::around(current, row, col);
        out[col] = rule.next_state(current[[row, col]], counts, rng);
    }
}
