use ndarray::{s, Array2};
use sharkgrid::{
    cluster, simulation, Cell, EngineConfig, Error, LocalGrid, PartitionPlan, SeedPolicy,
    Worker,
};
use std::thread;

fn config(rows: usize, cols: usize, workers: usize, threads: usize) -> EngineConfig {
    EngineConfig {
        rows,
        cols,
        workers,
        threads,
        seed: 42,
        seeding: SeedPolicy::Weighted {
            shark: 20,
            fish: 50,
            water: 30,
        },
        ..EngineConfig::default()
    }
}

/// Seed every worker, exchange halos once and hand back each worker's grid in rank order.
fn exchanged(config: &EngineConfig) -> Vec<LocalGrid> {
    thread::scope(|scope| {
        let handles: Vec<_> = cluster(config.workers)
            .into_iter()
            .map(|comm| {
                scope.spawn(move || {
                    let mut worker = Worker::from_config(comm, config).unwrap();
                    worker.seed(&config.seeding).unwrap();
                    worker.exchange_halos().unwrap();
                    worker.grid().clone()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

fn assert_halos(grids: &[LocalGrid]) {
    let workers = grids.len();
    for (rank, grid) in grids.iter().enumerate() {
        let rows = grid.interior_rows();
        let cols = grid.interior_cols();
        let prev = &grids[(rank + workers - 1) % workers];
        let next = &grids[(rank + 1) % workers];
        assert_eq!(
            grid.row_cells(0).unwrap(),
            prev.last_interior_row(),
            "top halo of worker {}",
            rank
        );
        assert_eq!(
            grid.row_cells(rows + 1).unwrap(),
            next.first_interior_row(),
            "bottom halo of worker {}",
            rank
        );
        for row in 0..=rows + 1 {
            assert_eq!(
                grid.get(row, 0).unwrap(),
                grid.get(row, cols).unwrap(),
                "left halo of worker {} row {}",
                rank,
                row
            );
            assert_eq!(
                grid.get(row, cols + 1).unwrap(),
                grid.get(row, 1).unwrap(),
                "right halo of worker {} row {}",
                rank,
                row
            );
        }
    }
}

#[test]
fn halos_single_partition() {
    assert_halos(&exchanged(&config(6, 7, 1, 1)));
}

#[test]
fn halos_many_partitions() {
    for &workers in &[2, 3, 4, 7] {
        assert_halos(&exchanged(&config(7, 5, workers, 1)));
    }
}

#[test]
fn ring_end_corners_close_the_torus() {
    let grids = exchanged(&config(9, 6, 3, 1));
    let first = &grids[0];
    let last = &grids[2];
    let rows = last.interior_rows();
    assert_eq!(first.get(0, 0).unwrap(), last.get(rows, 6).unwrap());
    assert_eq!(first.get(0, 7).unwrap(), last.get(rows, 1).unwrap());
    assert_eq!(last.get(rows + 1, 0).unwrap(), first.get(1, 6).unwrap());
    assert_eq!(last.get(rows + 1, 7).unwrap(), first.get(1, 1).unwrap());
}

#[test]
fn assembles_in_partition_order() {
    let plan = PartitionPlan::new(32, 4).unwrap();
    assert_eq!(plan.row_counts(), &[8, 8, 8, 8]);
    let cols = 5;
    let config = EngineConfig {
        rows: 32,
        cols,
        workers: 4,
        ..EngineConfig::default()
    };
    let (global, partitions) = thread::scope(|scope| {
        let handles: Vec<_> = cluster(4)
            .into_iter()
            .map(|comm| {
                let config = &config;
                scope.spawn(move || {
                    let mut worker = Worker::from_config(comm, config).unwrap();
                    let rank = worker.rank() as Cell;
                    for row in 1..=8 {
                        for col in 1..=cols {
                            let value = rank * 100 + row as Cell * 10 + col as Cell;
                            worker.grid_mut().set(row, col, value).unwrap();
                        }
                    }
                    let partition = worker.grid().interior().to_owned();
                    let global = worker.assemble().unwrap().cloned();
                    // Other workers keep their own partition.
                    if rank != 0 {
                        assert_eq!(worker.grid().interior(), partition);
                    }
                    (global, partition)
                })
            })
            .collect();
        let mut global = None;
        let mut partitions = Vec::new();
        for handle in handles {
            let (g, p) = handle.join().unwrap();
            if g.is_some() {
                global = g;
            }
            partitions.push(p);
        }
        (global.unwrap(), partitions)
    });

    assert_eq!(global.interior_rows(), 32);
    assert_eq!(global.interior_cols(), cols);
    for i in 0..32 {
        assert_eq!(
            global.interior().row(i),
            partitions[i / 8].row(i % 8),
            "global row {}",
            i
        );
    }
}

#[test]
fn assembled_coordinator_stops_stepping() {
    let config = config(4, 4, 1, 1);
    let mut worker = Worker::from_config(cluster(1).pop().unwrap(), &config).unwrap();
    worker.seed(&config.seeding).unwrap();
    worker.step().unwrap();
    let interior = worker.grid().interior().to_owned();
    let assembled = worker.assemble().unwrap().unwrap();
    assert_eq!(assembled.interior(), interior);
    assert!(matches!(worker.step(), Err(Error::Configuration(_))));
}

#[test]
fn scatter_then_gather_keeps_the_grid() {
    let config = config(11, 4, 3, 1);
    let initial = Array2::from_shape_fn((11, 4), |(r, c)| (r * 4 + c) as Cell % 7 - 3);
    let gathered = thread::scope(|scope| {
        let handles: Vec<_> = cluster(3)
            .into_iter()
            .map(|comm| {
                let config = &config;
                let initial = initial.view();
                scope.spawn(move || {
                    let mut worker = Worker::from_config(comm, config).unwrap();
                    let share = if worker.is_coordinator() {
                        Some(initial)
                    } else {
                        None
                    };
                    worker.scatter(share).unwrap();
                    let first = worker.grid().first_row();
                    let rows = worker.grid().interior_rows();
                    assert_eq!(
                        worker.grid().interior(),
                        initial.slice(s![first..first + rows, ..])
                    );
                    worker.gather().unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(gathered.len(), 1);
    assert_eq!(gathered[0], initial);
}

#[test]
fn coordinator_must_supply_scatter_grid() {
    let config = config(3, 3, 1, 1);
    let mut worker = Worker::from_config(cluster(1).pop().unwrap(), &config).unwrap();
    assert!(matches!(worker.scatter(None), Err(Error::Configuration(_))));
    let wrong: Array2<Cell> = Array2::zeros((2, 3));
    assert!(matches!(
        worker.scatter(Some(wrong.view())),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn layout_does_not_change_the_outcome() {
    let steps = 12;
    let reference = simulation::run(&config(24, 17, 1, 1), steps).unwrap();
    for &(workers, threads) in &[(1, 4), (2, 1), (3, 2), (4, 3), (5, 1), (24, 1)] {
        let report = simulation::run(&config(24, 17, workers, threads), steps).unwrap();
        assert_eq!(
            report.grid.interior(),
            reference.grid.interior(),
            "{} workers x {} threads",
            workers,
            threads
        );
        assert_eq!(report.census, reference.census);
    }
}

#[test]
fn bad_layouts_fail_before_running() {
    assert!(matches!(
        simulation::run(&config(3, 3, 4, 1), 1),
        Err(Error::Configuration(_))
    ));
    let mut bad = config(8, 8, 2, 1);
    bad.seeding = SeedPolicy::Weighted {
        shark: 60,
        fish: 60,
        water: 0,
    };
    assert!(matches!(
        simulation::run(&bad, 1),
        Err(Error::Configuration(_))
    ));
}
