//! Plain-text population checkpoints
//!
//! One line per individual:
//!
//! ```text
//! Indivíduo 1: Genes = [4, 0, 8, 2, 6, 1, 3, 5, 7]
//! ```
//!
//! Fitness is not stored; loaded individuals start from zero.

use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::genome::{Genome, Individual};

const LINE_PREFIX: &str = "Indivíduo";
const GENES_MARKER: &str = "Genes = ";

/// Render one checkpoint line (index is 1-based)
pub fn format_line(index: usize, genome: &Genome) -> String {
    let genes: Vec<String> = genome.as_slice().iter().map(usize::to_string).collect();
    format!("{LINE_PREFIX} {index}: {GENES_MARKER}[{}]", genes.join(", "))
}

/// Parse the genome out of a checkpoint line
pub fn parse_line(line: &str, cell_count: usize) -> Result<Genome> {
    let malformed = || CoreError::MalformedLine(line.trim().to_string());

    let (_, genes) = line.split_once(GENES_MARKER).ok_or_else(malformed)?;
    let inner = genes
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(malformed)?;

    let cells = inner
        .split(',')
        .map(|g| g.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    Genome::new(cells, cell_count)
}

/// Write the population, creating parent directories as needed
pub fn save_population(path: &Path, population: &[Individual]) -> Result<()> {
    let io_err = |source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut content = String::new();
    for (i, ind) in population.iter().enumerate() {
        content.push_str(&format_line(i + 1, ind.genome()));
        content.push('\n');
    }
    fs::write(path, content).map_err(io_err)?;

    tracing::debug!("Saved {} individuals to {}", population.len(), path.display());
    Ok(())
}

/// Load up to `population_size` individuals from a checkpoint.
///
/// A missing file yields an empty population. Lines that fail to parse, or
/// whose genome does not fit the board, are skipped with a warning; they still
/// count against `population_size`.
pub fn load_population(
    path: &Path,
    population_size: usize,
    cell_count: usize,
) -> Result<Vec<Individual>> {
    Ok(load_numbered_population(path, population_size, cell_count)?
        .into_iter()
        .map(|(_, individual)| individual)
        .collect())
}

/// Like `load_population`, paired with each individual's 1-based line number in the file
pub fn load_numbered_population(
    path: &Path,
    population_size: usize,
    cell_count: usize,
) -> Result<Vec<(usize, Individual)>> {
    if !path.exists() {
        tracing::warn!(
            "Checkpoint {} not found, starting from a random population",
            path.display()
        );
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut population = Vec::new();
    for (number, line) in content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, l)| !l.trim().is_empty())
        .take(population_size)
    {
        match parse_line(line, cell_count) {
            Ok(genome) => population.push((number, Individual::new(genome))),
            Err(e) => tracing::warn!("Skipping checkpoint line {}: {}", number, e),
        }
    }

    tracing::debug!("Loaded {} individuals from {}", population.len(), path.display());
    Ok(population)
}
