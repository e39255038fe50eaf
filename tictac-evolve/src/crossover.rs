//! Order-preserving crossover for move-priority genomes
//!
//! The child keeps a prefix of the first parent and fills the rest with the
//! second parent's cells in their original order, skipping cells already taken.
//! The result is always a permutation when both parents are.

use std::ops::RangeInclusive;

use rand::Rng;
use tictac_core::{CoreError, Genome, Result};

/// Valid cut points for genomes of length `len`: `1..=len-1`
pub fn cut_range(len: usize) -> Option<RangeInclusive<usize>> {
    (len >= 2).then(|| 1..=len - 1)
}

/// Crossover with a uniformly random cut point.
///
/// Genomes shorter than two cells have no interior cut; the child is a copy of
/// the first parent.
pub fn order_crossover<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Result<Genome> {
    match cut_range(a.len()) {
        Some(range) => order_crossover_at(a, b, rng.gen_range(range)),
        None => order_crossover_at(a, b, a.len()),
    }
}

/// Crossover at a fixed cut point
///
/// # Arguments
/// * `a` - Parent contributing the prefix
/// * `b` - Parent contributing the remaining cells, in order
/// * `cut` - Prefix length taken from `a`
pub fn order_crossover_at(a: &Genome, b: &Genome, cut: usize) -> Result<Genome> {
    if a.len() != b.len() {
        return Err(CoreError::GenomeLengthMismatch {
            genome_len: b.len(),
            cell_count: a.len(),
        });
    }

    let cut = cut.min(a.len());
    let prefix = &a.as_slice()[..cut];
    let mut taken = vec![false; a.len()];
    for &cell in prefix {
        if let Some(slot) = taken.get_mut(cell) {
            *slot = true;
        }
    }

    let mut cells = prefix.to_vec();
    cells.extend(
        b.as_slice()
            .iter()
            .copied()
            .filter(|&cell| !taken.get(cell).copied().unwrap_or(false)),
    );

    // Parents over different symbol sets would leave gaps or duplicates here
    Genome::new(cells, a.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ascending() -> Genome {
        Genome::identity(9)
    }

    fn descending() -> Genome {
        Genome::new((0..9).rev().collect(), 9).unwrap()
    }

    #[test]
    fn test_cut_three_scenario() {
        let child = order_crossover_at(&ascending(), &descending(), 3).unwrap();
        assert_eq!(child.as_slice(), &[0, 1, 2, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_cut_range() {
        assert_eq!(cut_range(9), Some(1..=8));
        assert_eq!(cut_range(16), Some(1..=15));
        assert_eq!(cut_range(1), None);
    }

    #[test]
    fn test_every_cut_yields_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            let a = Genome::random(9, &mut rng);
            let b = Genome::random(9, &mut rng);
            for cut in 1..=8 {
                let child = order_crossover_at(&a, &b, cut).unwrap();
                assert!(child.validate(9).is_ok());
                assert_eq!(&child.as_slice()[..cut], &a.as_slice()[..cut]);
            }
        }
    }

    #[test]
    fn test_random_crossover_uses_interior_cut() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = ascending();
        let b = descending();
        let mut children = std::collections::HashSet::new();
        for _ in 0..200 {
            let child = order_crossover(&a, &b, &mut rng).unwrap();
            // A cut of 0 would start with b's first cell
            assert_eq!(child.get(0), Some(0));
            children.insert(child);
        }
        // Each of the cuts 1..=8 gives a distinct child
        assert_eq!(children.len(), 8);
    }

    #[test]
    fn test_larger_genomes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = Genome::random(16, &mut rng);
        let b = Genome::random(16, &mut rng);
        for _ in 0..50 {
            let child = order_crossover(&a, &b, &mut rng).unwrap();
            assert!(child.validate(16).is_ok());
        }
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = order_crossover_at(&Genome::identity(9), &Genome::identity(4), 2).unwrap_err();
        assert!(matches!(err, CoreError::GenomeLengthMismatch { .. }));
    }
}
