//! Swap mutation
//!
//! Exchanges two distinct genome positions, which keeps the genome a
//! permutation.

use rand::seq::index;
use rand::Rng;
use tictac_core::Genome;

/// With probability `rate`, swap two distinct random positions.
///
/// Returns whether a swap happened. Genomes with fewer than two cells are
/// never changed, and neither is any genome when `rate` is NaN.
pub fn swap_mutation<R: Rng + ?Sized>(genome: &mut Genome, rate: f64, rng: &mut R) -> bool {
    if genome.len() < 2 || rate.is_nan() || !rng.gen_bool(rate.clamp(0.0, 1.0)) {
        return false;
    }

    let picks = index::sample(rng, genome.len(), 2);
    genome.swap(picks.index(0), picks.index(1));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rate_one_always_swaps_two_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            let mut genome = Genome::identity(9);
            assert!(swap_mutation(&mut genome, 1.0, &mut rng));

            let moved = genome
                .as_slice()
                .iter()
                .enumerate()
                .filter(|&(i, &cell)| i != cell)
                .count();
            assert_eq!(moved, 2);
            assert!(genome.validate(9).is_ok());
        }
    }

    #[test]
    fn test_rate_zero_never_swaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut genome = Genome::identity(9);
        for _ in 0..100 {
            assert!(!swap_mutation(&mut genome, 0.0, &mut rng));
        }
        assert_eq!(genome, Genome::identity(9));
    }

    #[test]
    fn test_mutation_preserves_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut genome = Genome::random(16, &mut rng);
        for _ in 0..1000 {
            swap_mutation(&mut genome, 0.5, &mut rng);
            assert_eq!(genome.len(), 16);
            assert!(genome.validate(16).is_ok());
        }
    }

    #[test]
    fn test_rate_is_respected_roughly() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut genome = Genome::identity(9);
        let swaps = (0..10_000)
            .filter(|_| swap_mutation(&mut genome, 0.04, &mut rng))
            .count();
        assert!(swaps > 250 && swaps < 550, "got {swaps} swaps");
    }

    #[test]
    fn test_nan_rate_never_swaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut genome = Genome::identity(9);
        assert!(!swap_mutation(&mut genome, f64::NAN, &mut rng));
        assert_eq!(genome, Genome::identity(9));
    }

    #[test]
    fn test_single_cell_genome_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut genome = Genome::identity(1);
        assert!(!swap_mutation(&mut genome, 1.0, &mut rng));
    }
}
