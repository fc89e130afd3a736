use crate::{Cell, LocalGrid, Species};
use itertools::Itertools;
use ndarray::{ArrayView2, Axis};

/// Characters used to draw each species.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub shark: char,
    pub fish: char,
    pub water: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            shark: 'X',
            fish: 'f',
            water: '.',
        }
    }
}

impl Glyphs {
    #[inline]
    pub fn glyph(&self, cell: Cell) -> char {
        match Species::of(cell) {
            Species::Shark => self.shark,
            Species::Fish => self.fish,
            Species::Water => self.water,
        }
    }
}

/// One line of glyphs per row of `cells`.
pub fn render(cells: ArrayView2<'_, Cell>, glyphs: &Glyphs) -> String {
    cells
        .axis_iter(Axis(0))
        .map(|row| row.iter().map(|&c| glyphs.glyph(c)).collect::<String>())
        .join("\n")
}

impl LocalGrid {
    /// Draw the interior of the current generation.
    pub fn render(&self, glyphs: &Glyphs) -> String {
        render(self.interior(), glyphs)
    }
}
