use boolinator::Boolinator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A single grid cell.
///
/// The sign is the species (positive fish, negative shark, zero water) and the
/// magnitude is the age in steps.
pub type Cell = i32;

pub const WATER: Cell = 0;
/// Fish die when they would age past this.
pub const FISH_MAX_AGE: u32 = 10;
/// Sharks die when they would age past this.
pub const SHARK_MAX_AGE: u32 = 20;
/// Fish of at least this age count towards spawning.
pub const FISH_BREEDING_AGE: u32 = 2;
/// Sharks of at least this age count towards spawning.
pub const SHARK_BREEDING_AGE: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Water,
    Fish,
    Shark,
}

impl Species {
    #[inline]
    pub fn of(cell: Cell) -> Self {
        match cell {
            c if c > 0 => Species::Fish,
            c if c < 0 => Species::Shark,
            _ => Species::Water,
        }
    }

    /// The age at which this species starts to count as breeding, if it breeds at all.
    #[inline]
    pub fn breeding_age(self) -> Option<u32> {
        match self {
            Species::Fish => Some(FISH_BREEDING_AGE),
            Species::Shark => Some(SHARK_BREEDING_AGE),
            Species::Water => None,
        }
    }
}

/// Age of the organism in a cell, zero for water.
#[inline]
pub fn age(cell: Cell) -> u32 {
    cell.unsigned_abs()
}

/// Returns the species of the cell if it is old enough to breed.
#[inline]
pub fn breeding(cell: Cell) -> Option<Species> {
    let species = Species::of(cell);
    species
        .breeding_age()
        .and_then(|min| (age(cell) >= min).as_some(species))
}

/// Population counts over a set of cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub sharks: usize,
    pub fish: usize,
    pub water: usize,
}

impl Census {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut census = Census::default();
        for &cell in cells {
            census.record(cell);
        }
        census
    }

    #[inline]
    pub fn record(&mut self, cell: Cell) {
        match Species::of(cell) {
            Species::Shark => self.sharks += 1,
            Species::Fish => self.fish += 1,
            Species::Water => self.water += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.sharks + self.fish + self.water
    }
}

impl Add for Census {
    type Output = Census;

    fn add(self, other: Census) -> Census {
        Census {
            sharks: self.sharks + other.sharks,
            fish: self.fish + other.fish,
            water: self.water + other.water,
        }
    }
}

impl AddAssign for Census {
    fn add_assign(&mut self, other: Census) {
        *self = *self + other;
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sharks: {}, fish: {}, water: {}",
            self.sharks, self.fish, self.water
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_follows_sign() {
        assert_eq!(Species::of(7), Species::Fish);
        assert_eq!(Species::of(-12), Species::Shark);
        assert_eq!(Species::of(WATER), Species::Water);
        assert_eq!(age(-12), 12);
    }

    #[test]
    fn breeding_thresholds() {
        assert_eq!(breeding(1), None);
        assert_eq!(breeding(2), Some(Species::Fish));
        assert_eq!(breeding(-2), None);
        assert_eq!(breeding(-3), Some(Species::Shark));
        assert_eq!(breeding(WATER), None);
    }

    #[test]
    fn census_counts_and_adds() {
        let a = Census::from_cells(&[1, -1, 0, 0, 4]);
        assert_eq!(
            a,
            Census {
                sharks: 1,
                fish: 2,
                water: 2
            }
        );
        let b = a + a;
        assert_eq!(b.total(), 10);
        assert_eq!(b.to_string(), "sharks: 2, fish: 4, water: 4");
    }
}
