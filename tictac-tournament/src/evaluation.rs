//! Population fitness evaluation
//!
//! Level 1 - Orchestration and Level 2 - Phases
//!
//! The parallel phase runs one task per individual. Every task gets its own
//! RNG (seeded from the caller's RNG before the phase starts), reads the
//! population immutably and plays each game on its own board copy. Tasks
//! return a fitness delta for the individual they own; deltas are applied only
//! after every task has finished, so each fitness value has a single writer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tictac_core::{Board, Individual, Player, Result};

use crate::config::EvalConfig;
use crate::fitness::FitnessPolicy;
use crate::match_play::{compete, play_round};

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Evaluate the population according to `config`
pub fn evaluate_population<R: Rng + ?Sized>(
    population: &mut [Individual],
    template: &Board,
    config: &EvalConfig,
    rng: &mut R,
) -> Result<()> {
    if config.parallel {
        evaluate_population_parallel(population, template, config.games_per_individual, rng)
    } else {
        evaluate_population_sequential(population, template, config.games_per_individual, rng)
    }
}

/// Parallel evaluation with the pairwise policy applied to the owning individual only
pub fn evaluate_population_parallel<R: Rng + ?Sized>(
    population: &mut [Individual],
    template: &Board,
    games_per_individual: usize,
    rng: &mut R,
) -> Result<()> {
    let seeds: Vec<u64> = (0..population.len()).map(|_| rng.gen()).collect();

    let snapshot: &[Individual] = population;
    let deltas = snapshot
        .par_iter()
        .enumerate()
        .zip(seeds.par_iter())
        .map(|((index, _), &seed)| {
            let mut task_rng = ChaCha8Rng::seed_from_u64(seed);
            evaluate_individual(index, snapshot, template, games_per_individual, &mut task_rng)
        })
        .collect::<Result<Vec<i64>>>()?;

    for (individual, delta) in population.iter_mut().zip(deltas) {
        individual.fitness += delta;
    }

    tracing::debug!(
        "Evaluated {} individuals ({} games each)",
        population.len(),
        games_per_individual
    );
    Ok(())
}

/// Sequential evaluation through `play_round`.
///
/// Each game updates both participants, so opponents also collect points from
/// games they did not initiate.
pub fn evaluate_population_sequential<R: Rng + ?Sized>(
    population: &mut [Individual],
    template: &Board,
    games_per_individual: usize,
    rng: &mut R,
) -> Result<()> {
    let n = population.len();
    for index in 0..n {
        for _ in 0..games_per_individual {
            let Some(opponent) = random_opponent(index, n, rng) else {
                break;
            };
            let (subject, other) = pair_mut(population, index, opponent);
            play_round(subject, other, template, rng)?;
        }
    }
    Ok(())
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Fitness delta earned by `population[index]` over `games` random games
pub fn evaluate_individual<R: Rng + ?Sized>(
    index: usize,
    population: &[Individual],
    template: &Board,
    games: usize,
    rng: &mut R,
) -> Result<i64> {
    let subject = population[index].genome();
    let mut delta = 0;

    for _ in 0..games {
        let Some(opponent) = random_opponent(index, population.len(), rng) else {
            break;
        };
        let winner = compete(subject, population[opponent].genome(), template, rng)?;
        delta += FitnessPolicy::Pairwise.points_for(Player::First, winner);
    }

    Ok(delta)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Uniform opponent index other than `index`, `None` when nobody else exists
fn random_opponent<R: Rng + ?Sized>(index: usize, len: usize, rng: &mut R) -> Option<usize> {
    if len < 2 {
        return None;
    }
    let pick = rng.gen_range(0..len - 1);
    Some(if pick >= index { pick + 1 } else { pick })
}

/// Two distinct mutable entries of a slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut needs distinct indices");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
