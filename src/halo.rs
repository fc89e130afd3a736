//! Filling the halo of a worker's current buffer before an update pass.
//!
//! Workers form a ring in rank order, which closes the torus vertically. Columns always
//! wrap within a worker. The only cells no single row message covers are the four corners
//! at the ends of the ring, which the first and last worker trade directly.

use crate::{Communicator, LocalGrid, Payload, Result, Tag};
use log::trace;

/// Populate every halo cell of `grid` from whoever owns it.
///
/// Returns once this worker's own sends and receives for the step have completed.
pub fn exchange<C: Communicator>(grid: &mut LocalGrid, comm: &mut C) -> Result<()> {
    let rows = grid.interior_rows();
    if comm.size() == 1 {
        wrap_rows(grid)?;
        grid.wrap_columns(0..=rows + 1);
        return Ok(());
    }

    exchange_rows(grid, comm)?;
    grid.wrap_columns(1..=rows);

    let rank = comm.rank();
    let last = comm.size() - 1;
    if rank == 0 {
        exchange_top_corners(grid, comm, last)?;
    } else {
        grid.wrap_columns(Some(0));
    }
    if rank == last {
        exchange_bottom_corners(grid, comm)?;
    } else {
        grid.wrap_columns(Some(rows + 1));
    }
    trace!("worker {} halo complete", rank);
    Ok(())
}

/// A lone worker is its own ring neighbour in both directions.
fn wrap_rows(grid: &mut LocalGrid) -> Result<()> {
    let top = grid.last_interior_row();
    let bottom = grid.first_interior_row();
    grid.set_top_halo(&top)?;
    grid.set_bottom_halo(&bottom)
}

fn exchange_rows<C: Communicator>(grid: &mut LocalGrid, comm: &mut C) -> Result<()> {
    let size = comm.size();
    let rank = comm.rank();
    let prev = (rank + size - 1) % size;
    let next = (rank + 1) % size;
    let cols = grid.interior_cols();

    comm.send(prev, Tag::Up, Payload::Row(grid.first_interior_row()))?;
    let bottom = comm.recv_row(next, Tag::Up, cols)?;
    grid.set_bottom_halo(&bottom)?;

    comm.send(next, Tag::Down, Payload::Row(grid.last_interior_row()))?;
    let top = comm.recv_row(prev, Tag::Down, cols)?;
    grid.set_top_halo(&top)
}

/// Rank 0's top corners are the last worker's bottom corners, seen across the torus.
fn exchange_top_corners<C: Communicator>(
    grid: &mut LocalGrid,
    comm: &mut C,
    last: usize,
) -> Result<()> {
    let cols = grid.interior_cols();
    comm.send(last, Tag::TopLeft, Payload::Cell(grid.get(1, 1)?))?;
    comm.send(last, Tag::TopRight, Payload::Cell(grid.get(1, cols)?))?;
    let top_left = comm.recv_cell(last, Tag::BottomRight)?;
    let top_right = comm.recv_cell(last, Tag::BottomLeft)?;
    grid.set(0, 0, top_left)?;
    grid.set(0, cols + 1, top_right)
}

/// The last worker's bottom corners are rank 0's top corners, seen across the torus.
fn exchange_bottom_corners<C: Communicator>(grid: &mut LocalGrid, comm: &mut C) -> Result<()> {
    let rows = grid.interior_rows();
    let cols = grid.interior_cols();
    comm.send(0, Tag::BottomLeft, Payload::Cell(grid.get(rows, 1)?))?;
    comm.send(0, Tag::BottomRight, Payload::Cell(grid.get(rows, cols)?))?;
    let bottom_left = comm.recv_cell(0, Tag::TopRight)?;
    let bottom_right = comm.recv_cell(0, Tag::TopLeft)?;
    grid.set(rows + 1, 0, bottom_left)?;
    grid.set(rows + 1, cols + 1, bottom_right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cluster, Cell};

    fn numbered(rows: usize, cols: usize) -> LocalGrid {
        let mut grid = LocalGrid::new(rows, cols).unwrap();
        for (i, (row, col)) in grid.interior_positions().collect::<Vec<_>>().into_iter().enumerate() {
            grid.set(row, col, i as Cell + 1).unwrap();
        }
        grid
    }

    #[test]
    fn single_worker_wraps_itself() {
        let mut comm = cluster(1).pop().unwrap();
        let mut grid = numbered(3, 4);
        exchange(&mut grid, &mut comm).unwrap();
        // 1  2  3  4
        // 5  6  7  8
        // 9 10 11 12
        assert_eq!(grid.row_cells(0).unwrap(), vec![9, 10, 11, 12]);
        assert_eq!(grid.row_cells(4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(grid.column(0).unwrap(), vec![12, 4, 8, 12, 4]);
        assert_eq!(grid.column(5).unwrap(), vec![9, 1, 5, 9, 1]);
    }

    #[test]
    fn one_by_one_sees_itself_everywhere() {
        let mut comm = cluster(1).pop().unwrap();
        let mut grid = LocalGrid::new(1, 1).unwrap();
        grid.set(1, 1, -7).unwrap();
        exchange(&mut grid, &mut comm).unwrap();
        assert!(grid.current().iter().all(|&c| c == -7));
    }
}
