//! Selection operators for genetic algorithms
//!
//! Implements tournament selection where individuals compete
//! in small tournaments, with the winner being selected for breeding.

use rand::seq::index;
use rand::Rng;
use tictac_core::Individual;

/// Default number of contestants per tournament
pub const DEFAULT_TOURNAMENT_SIZE: usize = 5;

/// Tournament selection: select an individual by running a tournament.
///
/// Draws `tournament_size` distinct individuals (without replacement) and
/// returns the index of the one with the highest fitness. Ties go to the
/// contestant drawn first. The size is clamped to the population size.
///
/// # Returns
/// Index of the winner, `None` for an empty population
pub fn tournament_select<R: Rng + ?Sized>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<usize> {
    if population.is_empty() {
        return None;
    }

    let k = tournament_size.clamp(1, population.len());
    index::sample(rng, population.len(), k)
        .into_iter()
        .reduce(|best, idx| {
            if population[idx].fitness > population[best].fitness {
                idx
            } else {
                best
            }
        })
}

/// Two independent tournaments; the same individual may win both
pub fn select_parents<R: Rng + ?Sized>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let first = tournament_select(population, tournament_size, rng)?;
    let second = tournament_select(population, tournament_size, rng)?;
    Some((first, second))
}

/// Index of the highest-fitness individual (first one on ties)
pub fn best_index(population: &[Individual]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .reduce(|best, cur| if cur.1.fitness > best.1.fitness { cur } else { best })
        .map(|(i, _)| i)
}
