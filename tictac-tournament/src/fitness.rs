//! Fitness policies
//!
//! Level 3 - Step-level implementation
//!
//! Two scoring rules coexist and are applied at different call sites:
//! - `Pairwise`: winner +1, loser -1, draw unchanged. Used by population
//!   evaluation and the round helper.
//! - `InGame`: winner +2, loser 0, draw +1 each. Used by standalone scored games.
//!
//! They put different selection pressure on draws and must stay separate.

use tictac_core::{Individual, Player};

/// Scoring rule for a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitnessPolicy {
    Pairwise,
    InGame,
}

impl FitnessPolicy {
    /// Points for (first, second) given the winner (`None` = draw)
    pub fn points(self, winner: Option<Player>) -> (i64, i64) {
        match (self, winner) {
            (FitnessPolicy::Pairwise, Some(Player::First)) => (1, -1),
            (FitnessPolicy::Pairwise, Some(Player::Second)) => (-1, 1),
            (FitnessPolicy::Pairwise, None) => (0, 0),
            (FitnessPolicy::InGame, Some(Player::First)) => (2, 0),
            (FitnessPolicy::InGame, Some(Player::Second)) => (0, 2),
            (FitnessPolicy::InGame, None) => (1, 1),
        }
    }

    /// Points for the participant sitting in `seat`
    pub fn points_for(self, seat: Player, winner: Option<Player>) -> i64 {
        let (first, second) = self.points(winner);
        match seat {
            Player::First => first,
            Player::Second => second,
        }
    }

    /// Add this policy's points to both participants
    pub fn apply(self, winner: Option<Player>, first: &mut Individual, second: &mut Individual) {
        let (a, b) = self.points(winner);
        first.fitness += a;
        second.fitness += b;
    }
}

/// Pairwise update: winner +1, loser -1, draw unchanged
pub fn score_pairwise(winner: Option<Player>, first: &mut Individual, second: &mut Individual) {
    FitnessPolicy::Pairwise.apply(winner, first, second);
}

/// In-game update: winner +2, loser 0, draw +1 each
pub fn score_in_game(winner: Option<Player>, first: &mut Individual, second: &mut Individual) {
    FitnessPolicy::InGame.apply(winner, first, second);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_core::Genome;

    fn pair() -> (Individual, Individual) {
        (
            Individual::new(Genome::identity(9)),
            Individual::new(Genome::identity(9)),
        )
    }

    #[test]
    fn test_pairwise_points() {
        let (mut a, mut b) = pair();
        score_pairwise(Some(Player::First), &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (1, -1));

        score_pairwise(None, &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (1, -1));

        score_pairwise(Some(Player::Second), &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (0, 0));
    }

    #[test]
    fn test_in_game_points() {
        let (mut a, mut b) = pair();
        score_in_game(Some(Player::Second), &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (0, 2));

        score_in_game(None, &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (1, 3));

        score_in_game(Some(Player::First), &mut a, &mut b);
        assert_eq!((a.fitness, b.fitness), (3, 3));
    }

    #[test]
    fn test_policies_differ_on_draws() {
        assert_eq!(FitnessPolicy::Pairwise.points(None), (0, 0));
        assert_eq!(FitnessPolicy::InGame.points(None), (1, 1));
    }

    #[test]
    fn test_points_for_seat() {
        let policy = FitnessPolicy::Pairwise;
        assert_eq!(policy.points_for(Player::Second, Some(Player::Second)), 1);
        assert_eq!(policy.points_for(Player::First, Some(Player::Second)), -1);
        assert_eq!(policy.points_for(Player::First, None), 0);
    }
}
