//! Balance simulator for Monte Carlo analysis.
//!
//! Plays thousands of games through the real `GameSession` with synthetic
//! players of configurable timing skill, to check:
//! - Total score spread and grade tier distribution
//! - Take-off and landing grade frequencies
//! - How often rounds end by forced resolution

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{LabelCount, SimReport};
pub use runner::{run_simulation, simulate_game, GameStats};
