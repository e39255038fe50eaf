//! Error types shared across the workspace

use std::path::PathBuf;

/// Result alias used by the library crates
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("board dimensions must be non-zero (got {rows}x{cols})")]
    InvalidBoard { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is outside a {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("genome is not a permutation of 0..{cell_count}: {reason}")]
    InvalidGenome { cell_count: usize, reason: String },

    #[error("genome length {genome_len} does not match board with {cell_count} cells")]
    GenomeLengthMismatch { genome_len: usize, cell_count: usize },

    #[error("mutation rate must lie in 0.0..=1.0 (got {0})")]
    InvalidMutationRate(f64),

    #[error("population is empty")]
    EmptyPopulation,

    #[error("malformed checkpoint line: {0}")]
    MalformedLine(String),

    #[error("checkpoint I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
