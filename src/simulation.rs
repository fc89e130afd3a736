//! Running a whole simulation with one thread per worker.

use crate::{cluster, Cell, Census, ChannelCommunicator, EngineConfig, Error, LocalGrid, Result, Worker};
use log::info;
use ndarray::ArrayView2;
use std::thread;
use std::time::{Duration, Instant};

/// What the coordinator holds at the end of a run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The assembled global grid.
    pub grid: LocalGrid,
    pub census: Census,
    pub generations: u64,
    /// Wall time spent stepping, excluding seeding and assembly.
    pub elapsed: Duration,
}

/// Seed a grid per `config`, step it `steps` times and assemble the result.
pub fn run(config: &EngineConfig, steps: u64) -> Result<RunReport> {
    launch(config, None, steps)
}

/// Like [`run`], but start from `initial` (the `rows x cols` interior) instead of seeding.
pub fn run_from(
    config: &EngineConfig,
    initial: ArrayView2<'_, Cell>,
    steps: u64,
) -> Result<RunReport> {
    launch(config, Some(initial), steps)
}

fn launch(
    config: &EngineConfig,
    initial: Option<ArrayView2<'_, Cell>>,
    steps: u64,
) -> Result<RunReport> {
    let plan = config.validate()?;
    if let Some(initial) = initial {
        if initial.dim() != (config.rows, config.cols) {
            return Err(Error::config(format!(
                "initial grid is {:?} but the configuration asks for {}x{}",
                initial.dim(),
                config.rows,
                config.cols
            )));
        }
    }
    info!(
        "running {} steps on a {}x{} grid, rows split {:?}, {} thread(s) per worker",
        steps,
        config.rows,
        config.cols,
        plan.row_counts(),
        config.threads
    );

    let results: Vec<Result<Option<RunReport>>> = thread::scope(|scope| {
        let handles: Vec<_> = cluster(config.workers)
            .into_iter()
            .map(|comm| scope.spawn(move || run_worker(comm, config, initial, steps)))
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut report = None;
    for result in results {
        if let Some(r) = result? {
            report = Some(r);
        }
    }
    let report =
        report.ok_or_else(|| Error::config("the coordinator did not produce a grid"))?;
    info!(
        "finished {} generations in {:?}: {}",
        report.generations, report.elapsed, report.census
    );
    Ok(report)
}

fn run_worker(
    comm: ChannelCommunicator,
    config: &EngineConfig,
    initial: Option<ArrayView2<'_, Cell>>,
    steps: u64,
) -> Result<Option<RunReport>> {
    let mut worker = Worker::from_config(comm, config)?;
    match initial {
        Some(initial) => {
            let share = worker.is_coordinator().then(|| initial);
            worker.scatter(share)?
        }
        None => worker.seed(&config.seeding)?,
    }
    let start = Instant::now();
    worker.run(steps)?;
    let elapsed = start.elapsed();
    let generations = worker.generation();
    Ok(worker.assemble()?.map(|grid| RunReport {
        grid: grid.clone(),
        census: grid.census(),
        generations,
        elapsed,
    }))
}
