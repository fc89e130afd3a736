//! Sharkgrid runs the sharks and fish predator/prey automaton on a toroidal grid.
//!
//! The grid is split row-wise over workers arranged in a ring. Before every step each worker
//! fills the one-cell halo around its partition from its ring neighbours (and wraps its own
//! columns), then computes the next generation of its interior, optionally on a thread pool.
//! A barrier separates generations. The coordinator (rank 0) can gather all partitions into
//! one grid at any point.
//!
//! ```no_run
//! use sharkgrid::{simulation, EngineConfig, Glyphs};
//!
//! let config = EngineConfig {
//!     rows: 32,
//!     cols: 48,
//!     workers: 4,
//!     threads: 2,
//!     ..EngineConfig::default()
//! };
//! let report = simulation::run(&config, 100).unwrap();
//! println!("{}\n{}", report.grid.render(&Glyphs::default()), report.census);
//! ```

mod assemble;
mod cell;
mod comm;
mod config;
mod direction;
mod engine;
mod error;
mod grid;
pub mod halo;
mod partition;
pub mod random;
mod render;
mod rule;
pub mod simulation;
mod worker;

pub use cell::*;
pub use comm::*;
pub use config::*;
pub use direction::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use partition::*;
pub use random::{ConstantRandom, RandomSource, StdRandom};
pub use render::*;
pub use rule::*;
pub use worker::*;
