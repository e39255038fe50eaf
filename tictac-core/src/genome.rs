//! Move-priority genomes and the individuals that carry them
//!
//! A genome is a permutation of the board's cell indices. On each of its turns
//! a player marks the earliest cell in its list that is still empty, so the
//! order of the permutation is the whole strategy.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Permutation of `0..cell_count`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Genome {
    cells: Vec<usize>,
}

impl Genome {
    /// Build a genome, rejecting anything that is not a permutation of `0..cell_count`
    pub fn new(cells: Vec<usize>, cell_count: usize) -> Result<Self> {
        validate_permutation(&cells, cell_count)?;
        Ok(Self { cells })
    }

    /// Identity ordering `0, 1, ..., cell_count - 1`
    pub fn identity(cell_count: usize) -> Self {
        Self {
            cells: (0..cell_count).collect(),
        }
    }

    /// Uniformly random permutation
    pub fn random<R: Rng + ?Sized>(cell_count: usize, rng: &mut R) -> Self {
        let mut cells: Vec<usize> = (0..cell_count).collect();
        cells.shuffle(rng);
        Self { cells }
    }

    /// Bypass validation; only for exercising malformed-genome handling
    #[cfg(test)]
    pub(crate) fn from_raw(cells: Vec<usize>) -> Self {
        Self { cells }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.cells.get(position).copied()
    }

    /// Swap two positions; a permutation stays a permutation
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    /// Re-check the permutation invariant against a board size
    pub fn validate(&self, cell_count: usize) -> Result<()> {
        validate_permutation(&self.cells, cell_count)
    }
}

fn validate_permutation(cells: &[usize], cell_count: usize) -> Result<()> {
    let invalid = |reason: String| CoreError::InvalidGenome { cell_count, reason };

    if cells.len() != cell_count {
        return Err(invalid(format!("length {}", cells.len())));
    }

    let mut seen = FxHashSet::default();
    for &cell in cells {
        if cell >= cell_count {
            return Err(invalid(format!("index {cell} out of range")));
        }
        if !seen.insert(cell) {
            return Err(invalid(format!("duplicate index {cell}")));
        }
    }
    Ok(())
}

/// Population member: genome plus accumulated fitness
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Individual {
    genome: Genome,
    /// Signed score accumulated over games; starts at 0
    pub fitness: i64,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self { genome, fitness: 0 }
    }

    pub fn random<R: Rng + ?Sized>(cell_count: usize, rng: &mut R) -> Self {
        Self::new(Genome::random(cell_count, rng))
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }
}
