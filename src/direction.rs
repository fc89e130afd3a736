use enum_iterator::IntoEnumIterator;
use Direction::*;

/// The eight neighbours of a cell, rotating counter-clockwise from the right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoEnumIterator)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// An iterator over all directions.
    #[inline]
    pub fn all() -> <Direction as IntoEnumIterator>::Iterator {
        Direction::into_enum_iter()
    }

    /// Offset as `(row, col)`, rows growing downwards.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Right => (0, 1),
            UpRight => (-1, 1),
            Up => (-1, 0),
            UpLeft => (-1, -1),
            Left => (0, -1),
            DownLeft => (1, -1),
            Down => (1, 0),
            DownRight => (1, 1),
        }
    }

    /// Apply the offset to a padded-buffer position. The position must not lie on the halo.
    #[inline]
    pub fn offset(self, row: usize, col: usize) -> (usize, usize) {
        let (dr, dc) = self.delta();
        (
            (row as isize + dr) as usize,
            (col as isize + dc) as usize,
        )
    }
}
