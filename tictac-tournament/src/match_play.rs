//! Match play - single games between two individuals
//!
//! Level 2/3 - Phase and step implementation

use rand::Rng;
use tictac_core::{Board, Game, Genome, Individual, Player, Result};

use crate::fitness::FitnessPolicy;

/// Play one game on a fresh copy of `template`.
///
/// Returns the winning seat, or `None` on a draw. Fitness is left untouched.
pub fn compete<R: Rng + ?Sized>(
    first: &Genome,
    second: &Genome,
    template: &Board,
    rng: &mut R,
) -> Result<Option<Player>> {
    let mut game = Game::new(first, second, template.clone(), rng)?;
    Ok(game.play()?.winner())
}

/// Play one game and apply the pairwise policy to both participants
pub fn play_round<R: Rng + ?Sized>(
    first: &mut Individual,
    second: &mut Individual,
    template: &Board,
    rng: &mut R,
) -> Result<Option<Player>> {
    let winner = compete(first.genome(), second.genome(), template, rng)?;
    FitnessPolicy::Pairwise.apply(winner, first, second);
    Ok(winner)
}

/// Play one standalone game scored with the in-game policy
pub fn play_scored_game<R: Rng + ?Sized>(
    first: &mut Individual,
    second: &mut Individual,
    template: &Board,
    rng: &mut R,
) -> Result<Option<Player>> {
    let winner = compete(first.genome(), second.genome(), template, rng)?;
    FitnessPolicy::InGame.apply(winner, first, second);
    Ok(winner)
}
