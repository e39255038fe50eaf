//! tictac evolution - genetic algorithm over move-priority genomes
//!
//! This crate provides the evolutionary loop:
//! - Tournament selection
//! - Order-preserving crossover
//! - Swap mutation
//! - Elitist generational replacement
//!
//! Every operator keeps genomes as permutations of the board's cells.

mod crossover;
mod engine;
mod mutation;
mod selection;

pub use crossover::{cut_range, order_crossover, order_crossover_at};
pub use engine::{EvolutionConfig, EvolutionResult, Evolver, GenerationStats};
pub use mutation::swap_mutation;
pub use selection::{best_index, select_parents, tournament_select, DEFAULT_TOURNAMENT_SIZE};
