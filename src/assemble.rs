//! Moving whole rows between the coordinator (rank 0) and the other workers.

use crate::random::RandomSource;
use crate::{Cell, Communicator, Error, LocalGrid, Payload, Result, Tag, Worker};
use log::debug;
use ndarray::{s, Array2, ArrayView2, Axis};

impl<C, R> Worker<C, R>
where
    C: Communicator,
    R: RandomSource + Sync,
{
    /// Distribute a full grid from the coordinator.
    ///
    /// The coordinator passes the `rows x cols` interior of the whole grid and keeps its own
    /// rows; every other worker passes `None` and receives its rows.
    pub fn scatter(&mut self, global: Option<ArrayView2<'_, Cell>>) -> Result<()> {
        let rows = self.plan().total_rows();
        let cols = self.grid().interior_cols();
        if !self.is_coordinator() {
            let first = self.grid().first_row();
            for r in 0..self.grid().interior_rows() {
                let cells = self
                    .comm_mut()
                    .recv_row(0, Tag::Scatter((first + r) as u64), cols)?;
                self.grid_mut().set_row_cells(r + 1, &cells)?;
            }
            return Ok(());
        }

        let global = global
            .ok_or_else(|| Error::config("the coordinator must supply the grid to scatter"))?;
        if global.dim() != (rows, cols) {
            return Err(Error::config(format!(
                "cannot scatter a {:?} grid over a {}x{} layout",
                global.dim(),
                rows,
                cols
            )));
        }
        let own = self.grid().interior_rows();
        self.grid_mut()
            .interior_mut()
            .assign(&global.slice(s![0..own, ..]));
        for (global_row, row) in global.axis_iter(Axis(0)).enumerate().skip(own) {
            let dest = self.plan().owner_of(global_row).map_or(0, |(rank, _)| rank);
            self.comm_mut().send(
                dest,
                Tag::Scatter(global_row as u64),
                Payload::Row(row.to_vec()),
            )?;
        }
        debug!("scattered {} rows from the coordinator", rows - own);
        Ok(())
    }

    /// Collect every worker's interior, in partition order, at the coordinator.
    ///
    /// The coordinator gets the `rows x cols` grid; the other workers get `None`. No worker's
    /// local state changes.
    pub fn gather(&mut self) -> Result<Option<Array2<Cell>>> {
        let cols = self.grid().interior_cols();
        if !self.is_coordinator() {
            let first = self.grid().first_row();
            for r in 1..=self.grid().interior_rows() {
                let cells = self.grid().row_cells(r)?;
                self.comm_mut()
                    .send(0, Tag::Gather((first + r - 1) as u64), Payload::Row(cells))?;
            }
            return Ok(None);
        }

        let rows = self.plan().total_rows();
        let own = self.grid().interior_rows();
        let mut global = Array2::zeros((rows, cols));
        global.slice_mut(s![0..own, ..]).assign(&self.grid().interior());
        for rank in 1..self.plan().workers() {
            let first = self.plan().first_row(rank);
            for global_row in first..first + self.plan().rows_of(rank) {
                let cells = self
                    .comm_mut()
                    .recv_row(rank, Tag::Gather(global_row as u64), cols)?;
                global
                    .row_mut(global_row)
                    .iter_mut()
                    .zip(cells)
                    .for_each(|(dest, cell)| *dest = cell);
            }
        }
        debug!("gathered {}x{} grid at the coordinator", rows, cols);
        Ok(Some(global))
    }

    /// Gather the whole grid and make it the coordinator's local grid.
    ///
    /// Afterwards the coordinator's extents are the global extents and it can no longer step.
    /// Other workers keep their partitions.
    pub fn assemble(&mut self) -> Result<Option<&LocalGrid>> {
        match self.gather()? {
            Some(global) => {
                self.replace_grid(LocalGrid::from_interior(global.view())?);
                Ok(Some(self.grid()))
            }
            None => Ok(None),
        }
    }
}
