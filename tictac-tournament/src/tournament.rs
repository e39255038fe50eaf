//! Round-robin tournament over a fixed population
//!
//! Level 1 - Orchestration and Level 3 - Steps

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tictac_core::{Board, CoreError, Individual, Player, Result};

use crate::fitness::FitnessPolicy;
use crate::match_play::compete;

/// Standing of a participant in the tournament
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    /// Index of the individual in the original slice
    pub index: usize,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Pairwise-policy points (wins - losses)
    pub points: i64,
}

impl Standing {
    fn new(index: usize) -> Self {
        Self {
            index,
            wins: 0,
            losses: 0,
            draws: 0,
            points: 0,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Win rate
    pub fn win_rate(&self) -> f32 {
        let games = self.games_played();
        if games == 0 {
            0.0
        } else {
            self.wins as f32 / games as f32
        }
    }

    fn record(&mut self, seat: Player, winner: Option<Player>) {
        match winner {
            Some(w) if w == seat => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
        self.points += FitnessPolicy::Pairwise.points_for(seat, winner);
    }
}

/// Every pair plays `games_per_pair` games; standings sorted by points (descending).
///
/// Pairs run in parallel, each with its own pre-seeded RNG.
pub fn run_round_robin<R: Rng + ?Sized>(
    population: &[Individual],
    template: &Board,
    games_per_pair: usize,
    rng: &mut R,
) -> Result<Vec<Standing>> {
    let pairings = generate_pairings(population.len());
    let seeds: Vec<u64> = pairings.iter().map(|_| rng.gen()).collect();

    let results = pairings
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&(i, j), &seed)| {
            let mut pair_rng = ChaCha8Rng::seed_from_u64(seed);
            let winners = (0..games_per_pair)
                .map(|_| {
                    compete(
                        population[i].genome(),
                        population[j].genome(),
                        template,
                        &mut pair_rng,
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            Ok::<_, CoreError>((i, j, winners))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut standings: Vec<Standing> = (0..population.len()).map(Standing::new).collect();
    for (i, j, winners) in results {
        for winner in winners {
            standings[i].record(Player::First, winner);
            standings[j].record(Player::Second, winner);
        }
    }

    standings.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
    Ok(standings)
}

/// Generate all pairings for round-robin
fn generate_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}
