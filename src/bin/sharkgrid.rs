use clap::Parser;
use log::error;
use sharkgrid::{simulation, EngineConfig, Glyphs, SeedPolicy, DEFAULT_SHARK_MORTALITY_ODDS};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(author, version, about = "Run the sharks and fish automaton", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 64)]
    rows: usize,

    #[arg(long, default_value_t = 64)]
    cols: usize,

    /// Row partitions, each run by its own worker.
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Update threads per worker.
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    #[arg(short, long, default_value_t = 100)]
    steps: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Seed sharks, fish and water with equal chance instead of percentages.
    #[arg(long, conflicts_with_all = ["shark", "fish", "water"])]
    uniform: bool,

    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    shark: i32,

    #[arg(long, default_value_t = 60, allow_negative_numbers = true)]
    fish: i32,

    #[arg(long, default_value_t = 25, allow_negative_numbers = true)]
    water: i32,

    /// A shark dies at random once in this many steps.
    #[arg(long, default_value_t = DEFAULT_SHARK_MORTALITY_ODDS)]
    mortality_odds: i32,

    /// Print the final grid.
    #[arg(short, long)]
    print: bool,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            rows: self.rows,
            cols: self.cols,
            workers: self.workers,
            threads: self.threads,
            shark_mortality_odds: self.mortality_odds,
            seeding: if self.uniform {
                SeedPolicy::Uniform
            } else {
                SeedPolicy::Weighted {
                    shark: self.shark,
                    fish: self.fish,
                    water: self.water,
                }
            },
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match simulation::run(&args.config(), args.steps) {
        Ok(report) => {
            if args.print {
                println!("{}", report.grid.render(&Glyphs::default()));
            }
            println!("{}", report.census);
            println!(
                "{} generations in {:.3?} ({:.3?} per step)",
                report.generations,
                report.elapsed,
                report.elapsed / report.generations.max(1) as u32
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
