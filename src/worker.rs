use crate::random::{RandomSource, StdRandom};
use crate::{
    halo, ChannelCommunicator, Communicator, EngineConfig, Error, LocalGrid, PartitionPlan, Result,
    Rule, SeedPolicy, UpdateEngine,
};
use log::{debug, trace};

/// One participant of a run: its partition of the grid, its link to the other workers,
/// and the engine that advances the partition.
///
/// A step is halo exchange, update, buffer swap and a barrier across all workers, so every
/// worker finishes generation `t` before any worker starts exchanging for `t + 1`.
pub struct Worker<C: Communicator, R: RandomSource> {
    comm: C,
    plan: PartitionPlan,
    grid: LocalGrid,
    engine: UpdateEngine,
    source: R,
    generation: u64,
    assembled: bool,
}

impl Worker<ChannelCommunicator, StdRandom> {
    /// Build a worker from a configuration. The grid is water until seeded or scattered.
    pub fn from_config(comm: ChannelCommunicator, config: &EngineConfig) -> Result<Self> {
        let plan = config.validate()?;
        let engine = UpdateEngine::new(Rule::new(config.shark_mortality_odds)?, config.threads)?;
        Worker::new(comm, plan, config.cols, engine, StdRandom::new(config.seed))
    }
}

impl<C, R> Worker<C, R>
where
    C: Communicator,
    R: RandomSource + Sync,
{
    pub fn new(
        comm: C,
        plan: PartitionPlan,
        cols: usize,
        engine: UpdateEngine,
        source: R,
    ) -> Result<Self> {
        if comm.size() != plan.workers() {
            return Err(Error::config(format!(
                "communicator joins {} workers but the plan has {}",
                comm.size(),
                plan.workers()
            )));
        }
        if cols == 0 {
            return Err(Error::config("grid has no columns"));
        }
        let rank = comm.rank();
        let grid = LocalGrid::with_offset(plan.rows_of(rank), cols, plan.first_row(rank))?;
        debug!(
            "worker {} owns rows {}..{} on {} thread(s)",
            rank,
            grid.first_row(),
            grid.first_row() + grid.interior_rows(),
            engine.threads()
        );
        Ok(Self {
            comm,
            plan,
            grid,
            engine,
            source,
            generation: 0,
            assembled: false,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.rank() == 0
    }

    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }

    pub fn grid(&self) -> &LocalGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut LocalGrid {
        &mut self.grid
    }

    /// Number of steps taken so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub(crate) fn comm_mut(&mut self) -> &mut C {
        &mut self.comm
    }

    pub(crate) fn replace_grid(&mut self, grid: LocalGrid) {
        self.grid = grid;
        self.assembled = true;
    }

    /// Fill this worker's interior according to `policy`.
    pub fn seed(&mut self, policy: &SeedPolicy) -> Result<()> {
        policy.validate()?;
        self.grid.seed(policy, &self.source);
        Ok(())
    }

    /// Populate the halo of the current buffer.
    pub fn exchange_halos(&mut self) -> Result<()> {
        halo::exchange(&mut self.grid, &mut self.comm)
    }

    /// Advance the whole distributed grid by one generation.
    pub fn step(&mut self) -> Result<()> {
        if self.assembled {
            return Err(Error::config(
                "this worker holds the assembled grid and can no longer step",
            ));
        }
        self.exchange_halos()?;
        self.engine
            .update(&mut self.grid, &self.source, self.generation);
        self.grid.swap_buffers();
        self.generation += 1;
        trace!("worker {} reached generation {}", self.rank(), self.generation);
        self.comm.barrier();
        Ok(())
    }

    pub fn run(&mut self, steps: u64) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }
}
