//! tictac tournament - fitness through game playing
//!
//! This crate provides the competition layer of the evolution loop:
//! - Single games between two genomes on a private board copy
//! - The two fitness policies (pairwise and in-game)
//! - Population evaluation, parallel or sequential
//! - Round-robin standings
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: evaluate_population, run_round_robin (orchestration)
//! - Level 2: evaluate_individual, play_round (phases)
//! - Level 3: compete, FitnessPolicy (steps)
//! - Level 4: configuration

mod config;
mod evaluation;
mod fitness;
mod match_play;
mod tournament;

pub use config::EvalConfig;
pub use evaluation::{
    evaluate_individual, evaluate_population, evaluate_population_parallel,
    evaluate_population_sequential,
};
pub use fitness::{score_in_game, score_pairwise, FitnessPolicy};
pub use match_play::{compete, play_round, play_scored_game};
pub use tournament::{run_round_robin, Standing};
