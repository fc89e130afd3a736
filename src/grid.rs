use crate::random::{stream_key, RandomSource, SEEDING_GENERATION};
use crate::{Cell, Census, Error, Result, SeedPolicy, WATER};
use itertools::iproduct;
use ndarray::{s, Array2, ArrayView2, ArrayViewMut2, Axis};

/// One worker's share of the grid.
///
/// Both buffers are `(rows + 2) x (cols + 2)`. Rows and columns `1..=rows` / `1..=cols` are
/// owned by this worker, the outer ring holds halo copies of neighbouring state. Reads go to
/// `current`, the update pass only writes the interior of `next`.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalGrid {
    current: Array2<Cell>,
    next: Array2<Cell>,
    first_row: usize,
}

impl LocalGrid {
    /// A grid of water whose first interior row is global row 0.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_offset(rows, cols, 0)
    }

    /// A grid of water whose first interior row is global row `first_row`.
    pub fn with_offset(rows: usize, cols: usize, first_row: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::config(format!(
                "local grid of {}x{} has no interior",
                rows, cols
            )));
        }
        Ok(Self {
            current: Array2::from_elem((rows + 2, cols + 2), WATER),
            next: Array2::from_elem((rows + 2, cols + 2), WATER),
            first_row,
        })
    }

    /// Pad the given interior cells with a halo.
    pub fn from_interior(cells: ArrayView2<'_, Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        let mut grid = Self::new(rows, cols)?;
        grid.interior_mut().assign(&cells);
        Ok(grid)
    }

    #[inline]
    pub fn interior_rows(&self) -> usize {
        self.current.nrows() - 2
    }

    #[inline]
    pub fn interior_cols(&self) -> usize {
        self.current.ncols() - 2
    }

    /// Global index of interior row 1.
    #[inline]
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = self.current.dim();
        if row < rows && col < cols {
            Ok(())
        } else {
            Err(Error::Index {
                row,
                col,
                rows,
                cols,
            })
        }
    }

    /// Read a cell of the current generation, halo included.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        self.check(row, col)?;
        Ok(self.current[[row, col]])
    }

    /// Write a cell of the current generation, halo included.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        self.check(row, col)?;
        self.current[[row, col]] = cell;
        Ok(())
    }

    /// The whole padded buffer of the current generation.
    pub fn current(&self) -> ArrayView2<'_, Cell> {
        self.current.view()
    }

    pub fn interior(&self) -> ArrayView2<'_, Cell> {
        self.current.slice(s![1..-1, 1..-1])
    }

    pub fn interior_mut(&mut self) -> ArrayViewMut2<'_, Cell> {
        self.current.slice_mut(s![1..-1, 1..-1])
    }

    /// Interior cells (columns `1..=cols`) of buffer row `row`, which may be a halo row.
    pub fn row_cells(&self, row: usize) -> Result<Vec<Cell>> {
        self.check(row, 0)?;
        Ok(self.current.slice(s![row, 1..-1]).to_vec())
    }

    /// The first owned row.
    pub fn first_interior_row(&self) -> Vec<Cell> {
        self.current.slice(s![1, 1..-1]).to_vec()
    }

    /// The last owned row.
    pub fn last_interior_row(&self) -> Vec<Cell> {
        self.current
            .slice(s![self.interior_rows(), 1..-1])
            .to_vec()
    }

    /// Column `col` of the buffer, halo rows included.
    pub fn column(&self, col: usize) -> Result<Vec<Cell>> {
        self.check(0, col)?;
        Ok(self.current.column(col).to_vec())
    }

    /// Overwrite columns `1..=cols` of buffer row `row`.
    pub fn set_row_cells(&mut self, row: usize, cells: &[Cell]) -> Result<()> {
        self.check(row, 0)?;
        let cols = self.interior_cols();
        if cells.len() != cols {
            return Err(Error::Index {
                row,
                col: cells.len(),
                rows: self.current.nrows(),
                cols: self.current.ncols(),
            });
        }
        self.current
            .slice_mut(s![row, 1..-1])
            .iter_mut()
            .zip(cells)
            .for_each(|(dest, &cell)| *dest = cell);
        Ok(())
    }

    pub fn set_top_halo(&mut self, cells: &[Cell]) -> Result<()> {
        self.set_row_cells(0, cells)
    }

    pub fn set_bottom_halo(&mut self, cells: &[Cell]) -> Result<()> {
        let row = self.interior_rows() + 1;
        self.set_row_cells(row, cells)
    }

    /// Copy the opposite interior column into both halo columns for every row in `rows`.
    pub fn wrap_columns(&mut self, rows: impl IntoIterator<Item = usize>) {
        let cols = self.interior_cols();
        for row in rows {
            self.current[[row, 0]] = self.current[[row, cols]];
            self.current[[row, cols + 1]] = self.current[[row, 1]];
        }
    }

    /// Exchange the roles of the two buffers so the freshly computed generation becomes current.
    #[inline]
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Read the current generation while writing the next one.
    pub(crate) fn buffers(&mut self) -> (ArrayView2<'_, Cell>, ArrayViewMut2<'_, Cell>) {
        (self.current.view(), self.next.view_mut())
    }

    /// Fill the interior according to `policy`. Halo cells are left as they are.
    ///
    /// Each global row draws from its own stream of `source`, so a grid split over several
    /// workers is seeded exactly like the unsplit grid.
    pub fn seed<R: RandomSource>(&mut self, policy: &SeedPolicy, source: &R) {
        let first_row = self.first_row;
        for (r, mut row) in self
            .current
            .slice_mut(s![1..-1, 1..-1])
            .axis_iter_mut(Axis(0))
            .enumerate()
        {
            let mut rng = source.stream(stream_key(SEEDING_GENERATION, first_row + r));
            for cell in row.iter_mut() {
                *cell = match *policy {
                    SeedPolicy::Uniform => match rng.next_int(0, 2) {
                        2 => -1,
                        n => n,
                    },
                    SeedPolicy::Weighted { shark, fish, .. } => {
                        let draw = rng.next_int(1, 100);
                        if draw <= shark {
                            -1
                        } else if draw <= shark + fish {
                            1
                        } else {
                            WATER
                        }
                    }
                };
            }
        }
    }

    pub fn census(&self) -> Census {
        Census::from_cells(self.interior().iter())
    }

    /// Interior positions in row-major order, in padded-buffer coordinates.
    pub fn interior_positions(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(1..=self.interior_rows(), 1..=self.interior_cols())
    }
}
