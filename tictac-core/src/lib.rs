//! tictac core - board, genomes and the game state machine
//!
//! This crate provides the building blocks shared by every other crate:
//! - Board geometry (rows x cols grid, win-line checks)
//! - Permutation genomes and individuals with signed fitness
//! - The two-player move-priority game
//! - The plain-text population checkpoint format

pub mod board;
pub mod checkpoint;
pub mod error;
pub mod game;
pub mod genome;

// Re-exports for convenient access
pub use board::{Board, Mark, STANDARD_SIZE};
pub use checkpoint::{
    format_line, load_numbered_population, load_population, parse_line, save_population,
};
pub use error::{CoreError, Result};
pub use game::{Game, GameState, Ply, Player};
pub use genome::{Genome, Individual};
