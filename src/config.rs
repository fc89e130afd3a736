use crate::{Error, PartitionPlan, Result, Rule};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHARK_MORTALITY_ODDS: i32 = 32;

/// How interior cells are filled before the first step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Shark, fish and water with equal chance.
    Uniform,
    /// Percent chances for each species. Whatever the three leave unassigned is water.
    Weighted { shark: i32, fish: i32, water: i32 },
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Weighted {
            shark: 15,
            fish: 60,
            water: 25,
        }
    }
}

impl SeedPolicy {
    pub fn validate(&self) -> Result<()> {
        if let SeedPolicy::Weighted { shark, fish, water } = *self {
            for (name, percent) in [("shark", shark), ("fish", fish), ("water", water)].iter() {
                if !(0..=100).contains(percent) {
                    return Err(Error::config(format!(
                        "{} percentage {} is outside [0, 100]",
                        name, percent
                    )));
                }
            }
            if shark + fish + water > 100 {
                return Err(Error::config(format!(
                    "seeding percentages sum to {}, more than 100",
                    shark + fish + water
                )));
            }
        }
        Ok(())
    }
}

/// Everything needed to lay out and run the automaton.
///
/// `workers` selects cross-worker partitioning and `threads` the intra-worker pool; either
/// can be 1 to switch that axis off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub workers: usize,
    pub threads: usize,
    /// A shark dies at random when a draw in `[1, odds]` comes up 1.
    pub shark_mortality_odds: i32,
    pub seeding: SeedPolicy,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            cols: 64,
            workers: 1,
            threads: 1,
            shark_mortality_odds: DEFAULT_SHARK_MORTALITY_ODDS,
            seeding: SeedPolicy::default(),
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Check every setting and build the partition plan.
    pub fn validate(&self) -> Result<PartitionPlan> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::config(format!(
                "grid of {}x{} has no cells",
                self.rows, self.cols
            )));
        }
        if self.threads == 0 {
            return Err(Error::config("at least one thread per worker is required"));
        }
        Rule::new(self.shark_mortality_odds)?;
        self.seeding.validate()?;
        PartitionPlan::new(self.rows, self.workers)
    }
}
