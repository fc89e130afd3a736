use crate::cell::{self, Species, FISH_MAX_AGE, SHARK_MAX_AGE};
use crate::config::DEFAULT_SHARK_MORTALITY_ODDS;
use crate::{Cell, Direction, Error, RandomSource, Result, WATER};
use ndarray::ArrayView2;

/// What a cell sees among its eight neighbours, itself excluded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    pub fish: u8,
    pub sharks: u8,
    pub breeding_fish: u8,
    pub breeding_sharks: u8,
}

impl NeighborCounts {
    /// Count the neighbourhood of `(row, col)` in a padded buffer. The position must be interior.
    #[inline]
    pub fn around(cells: &ArrayView2<'_, Cell>, row: usize, col: usize) -> Self {
        let mut counts = NeighborCounts::default();
        for dir in Direction::all() {
            let (r, c) = dir.offset(row, col);
            counts.record(cells[[r, c]]);
        }
        counts
    }

    #[inline]
    fn record(&mut self, cell: Cell) {
        let breeding = cell::breeding(cell).is_some();
        match Species::of(cell) {
            Species::Fish => {
                self.fish += 1;
                self.breeding_fish += breeding as u8;
            }
            Species::Shark => {
                self.sharks += 1;
                self.breeding_sharks += breeding as u8;
            }
            Species::Water => {}
        }
    }
}

/// The sharks and fish transition rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    shark_mortality_odds: i32,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            shark_mortality_odds: DEFAULT_SHARK_MORTALITY_ODDS,
        }
    }
}

impl Rule {
    /// A shark dies at random when a draw in `[1, shark_mortality_odds]` comes up 1, so the
    /// odds must be at least 1.
    pub fn new(shark_mortality_odds: i32) -> Result<Self> {
        if shark_mortality_odds < 1 {
            return Err(Error::config(format!(
                "shark mortality odds must be at least 1, got {}",
                shark_mortality_odds
            )));
        }
        Ok(Self {
            shark_mortality_odds,
        })
    }

    #[inline]
    pub fn shark_mortality_odds(&self) -> i32 {
        self.shark_mortality_odds
    }

    /// The next state of `cell` given its neighbourhood.
    ///
    /// Only living sharks consume a draw from `rng`, and only when they are not already
    /// starving.
    pub fn next_state<R: RandomSource>(
        &self,
        cell: Cell,
        counts: NeighborCounts,
        rng: &mut R,
    ) -> Cell {
        match Species::of(cell) {
            Species::Water => {
                if counts.fish >= 4 && counts.breeding_fish >= 3 && counts.sharks < 4 {
                    1
                } else if counts.sharks >= 4 && counts.breeding_sharks >= 3 && counts.fish < 4 {
                    -1
                } else {
                    WATER
                }
            }
            Species::Fish => {
                let eaten = counts.sharks >= 5;
                let crowded = counts.fish == 8;
                if eaten || crowded || cell::age(cell) >= FISH_MAX_AGE {
                    WATER
                } else {
                    cell + 1
                }
            }
            Species::Shark => {
                if counts.sharks >= 6 && counts.fish == 0 {
                    WATER
                } else if rng.next_int(1, self.shark_mortality_odds) == 1 {
                    WATER
                } else if cell::age(cell) >= SHARK_MAX_AGE {
                    WATER
                } else {
                    cell - 1
                }
            }
        }
    }
}
