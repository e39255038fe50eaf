//! Evolution engine - evaluation, selection, breeding and replacement
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: `Evolver::run` (generation loop)
//! - Level 2: `Evolver::step` (evaluate, record, replace)
//! - Level 3: `next_generation`, `select_parents`, `mutate`
//! - Level 4: configuration and statistics

use rand::Rng;
use serde::{Deserialize, Serialize};
use tictac_core::{Board, CoreError, Individual, Player, Result};
use tictac_tournament::{compete, evaluate_population, EvalConfig};

use crate::crossover::order_crossover;
use crate::mutation::swap_mutation;
use crate::selection::{self, best_index, DEFAULT_TOURNAMENT_SIZE};

// ============================================================================
// Level 4 - Configuration and statistics
// ============================================================================

/// Evolution configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability of a swap mutation per offspring
    pub mutation_rate: f64,
    /// Carry the best individual of each generation forward unchanged
    pub elitism: bool,
    pub games_per_individual: usize,
    pub tournament_size: usize,
    pub rows: usize,
    pub cols: usize,
    /// Evaluate on the rayon pool
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            generations: 10,
            mutation_rate: 0.04,
            elitism: true,
            games_per_individual: 5,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            rows: 3,
            cols: 3,
            parallel: true,
        }
    }
}

impl EvolutionConfig {
    /// Empty board template for this configuration
    pub fn board(&self) -> Result<Board> {
        Board::new(self.rows, self.cols)
    }

    /// Reject settings the operators cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CoreError::InvalidMutationRate(self.mutation_rate));
        }
        Ok(())
    }

    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            games_per_individual: self.games_per_individual,
            parallel: self.parallel,
        }
    }
}

/// Fitness summary of one evaluated generation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Zero-based generation number
    pub generation: usize,
    pub best_fitness: i64,
    pub avg_fitness: f64,
    pub worst_fitness: i64,
}

impl GenerationStats {
    pub fn from_population(generation: usize, population: &[Individual]) -> Self {
        let best_fitness = population.iter().map(|i| i.fitness).max().unwrap_or(0);
        let worst_fitness = population.iter().map(|i| i.fitness).min().unwrap_or(0);
        let avg_fitness = if population.is_empty() {
            0.0
        } else {
            population.iter().map(|i| i.fitness as f64).sum::<f64>() / population.len() as f64
        };

        Self {
            generation,
            best_fitness,
            avg_fitness,
            worst_fitness,
        }
    }
}

/// Outcome of a full run
#[derive(Clone, Debug)]
pub struct EvolutionResult {
    /// Population after the last replacement
    pub population: Vec<Individual>,
    /// Best evaluated individual of the last generation
    pub champion: Option<Individual>,
    pub history: Vec<GenerationStats>,
}

// ============================================================================
// Engine
// ============================================================================

/// Holds the population and the board template between generations
#[derive(Clone, Debug)]
pub struct Evolver {
    population: Vec<Individual>,
    template: Board,
    config: EvolutionConfig,
    generation: usize,
    champion: Option<Individual>,
}

impl Evolver {
    /// Create an engine around an existing population.
    ///
    /// Every genome must be a permutation of the template's cells.
    pub fn new(population: Vec<Individual>, template: Board, config: EvolutionConfig) -> Result<Self> {
        config.validate()?;
        for ind in &population {
            ind.genome().validate(template.cell_count())?;
        }
        Ok(Self {
            population,
            template,
            config,
            generation: 0,
            champion: None,
        })
    }

    /// Create an engine with `config.population_size` random individuals
    pub fn random<R: Rng + ?Sized>(
        template: Board,
        config: EvolutionConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let population = (0..config.population_size)
            .map(|_| Individual::random(template.cell_count(), rng))
            .collect();
        Self::new(population, template, config)
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Current highest-fitness individual
    pub fn best(&self) -> Option<&Individual> {
        best_index(&self.population).map(|i| &self.population[i])
    }

    // ========================================================================
    // Level 1 - Generation loop
    // ========================================================================

    /// Run `config.generations` generations, reporting each one to `on_generation`
    pub fn run<R, F>(mut self, rng: &mut R, mut on_generation: F) -> Result<EvolutionResult>
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationStats),
    {
        let mut history = Vec::with_capacity(self.config.generations);
        for _ in 0..self.config.generations {
            let stats = self.step(rng)?;
            on_generation(&stats);
            history.push(stats);
        }

        Ok(EvolutionResult {
            population: self.population,
            champion: self.champion,
            history,
        })
    }

    // ========================================================================
    // Level 2 - One generation
    // ========================================================================

    /// Evaluate, record statistics, then replace the population.
    ///
    /// Evaluation finishes for every individual before selection starts.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GenerationStats> {
        self.evaluate(rng)?;

        let stats = GenerationStats::from_population(self.generation, &self.population);
        self.champion = self.best().cloned();

        let next = self.next_generation(self.config.population_size, rng)?;
        self.population = next;
        self.generation += 1;

        Ok(stats)
    }

    /// Play this generation's games and accumulate fitness
    pub fn evaluate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        evaluate_population(
            &mut self.population,
            &self.template,
            &self.config.eval_config(),
            rng,
        )
    }

    // ========================================================================
    // Level 3 - Operators
    // ========================================================================

    /// One game between two members on a fresh board; winner index or `None` on a draw
    pub fn compete<R: Rng + ?Sized>(&self, a: usize, b: usize, rng: &mut R) -> Result<Option<usize>> {
        let winner = compete(
            self.population[a].genome(),
            self.population[b].genome(),
            &self.template,
            rng,
        )?;
        Ok(winner.map(|seat| match seat {
            Player::First => a,
            Player::Second => b,
        }))
    }

    /// Two parents by independent tournaments
    pub fn select_parents<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, usize)> {
        selection::select_parents(&self.population, self.config.tournament_size, rng)
            .ok_or(CoreError::EmptyPopulation)
    }

    /// Apply swap mutation and re-check the permutation invariant
    pub fn mutate<R: Rng + ?Sized>(&self, individual: &mut Individual, rng: &mut R) -> Result<bool> {
        let mutated = swap_mutation(individual.genome_mut(), self.config.mutation_rate, rng);
        individual.genome().validate(self.template.cell_count())?;
        Ok(mutated)
    }

    /// Build a new population of `target_size` from the current one.
    ///
    /// With elitism, a clone of the current best (fitness included) always
    /// comes first. Offspring start with zero fitness.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        target_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Individual>> {
        let mut next = Vec::with_capacity(target_size.max(1));

        if self.config.elitism {
            if let Some(best) = self.best() {
                tracing::debug!(fitness = best.fitness, "carrying elite forward");
                next.push(best.clone());
            }
        }

        while next.len() < target_size {
            let (a, b) = self.select_parents(rng)?;
            let genome = order_crossover(self.population[a].genome(), self.population[b].genome(), rng)?;
            let mut child = Individual::new(genome);
            self.mutate(&mut child, rng)?;
            next.push(child);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tictac_core::Genome;

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 30,
            generations: 3,
            games_per_individual: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 10_000);
        assert_eq!(config.generations, 10);
        assert_eq!(config.mutation_rate, 0.04);
        assert!(config.elitism);
        assert_eq!(config.games_per_individual, 5);
        assert_eq!(config.tournament_size, 5);
        assert_eq!(config.board().unwrap().cell_count(), 9);
    }

    #[test]
    fn test_random_engine_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let engine = Evolver::random(Board::standard(), small_config(), &mut rng).unwrap();
        assert_eq!(engine.population().len(), 30);
        assert!(engine.population().iter().all(|i| i.fitness == 0));
    }

    #[test]
    fn test_new_rejects_mismatched_genomes() {
        let population = vec![Individual::new(Genome::identity(4))];
        let err = Evolver::new(population, Board::standard(), small_config()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGenome { .. }));
    }

    #[test]
    fn test_elite_clone_keeps_fitness_and_genome() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut engine = Evolver::random(Board::standard(), small_config(), &mut rng).unwrap();
        engine.evaluate(&mut rng).unwrap();

        let best = engine.best().cloned().unwrap();
        let next = engine.next_generation(30, &mut rng).unwrap();

        assert_eq!(next.len(), 30);
        assert_eq!(next[0].genome(), best.genome());
        assert_eq!(next[0].fitness, best.fitness);
        assert!(next[1..].iter().all(|i| i.fitness == 0));
    }

    #[test]
    fn test_no_elitism_means_fresh_offspring() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = EvolutionConfig {
            elitism: false,
            ..small_config()
        };
        let mut engine = Evolver::random(Board::standard(), config, &mut rng).unwrap();
        engine.evaluate(&mut rng).unwrap();

        let next = engine.next_generation(30, &mut rng).unwrap();
        assert_eq!(next.len(), 30);
        assert!(next.iter().all(|i| i.fitness == 0));
    }

    #[test]
    fn test_offspring_are_valid_permutations() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = EvolutionConfig {
            mutation_rate: 0.5,
            ..small_config()
        };
        let mut engine = Evolver::random(Board::standard(), config, &mut rng).unwrap();
        engine.evaluate(&mut rng).unwrap();

        for child in engine.next_generation(100, &mut rng).unwrap() {
            assert!(child.genome().validate(9).is_ok());
        }
    }

    #[test]
    fn test_empty_population_cannot_breed() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let engine = Evolver::new(Vec::new(), Board::standard(), small_config()).unwrap();
        assert!(matches!(
            engine.next_generation(5, &mut rng),
            Err(CoreError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_compete_maps_winner_to_index() {
        let population = vec![
            Individual::new(Genome::identity(9)),
            Individual::new(Genome::new((0..9).rev().collect(), 9).unwrap()),
        ];
        let engine = Evolver::new(population, Board::standard(), small_config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let winner = engine.compete(1, 0, &mut rng).unwrap();
            assert!(matches!(winner, Some(0) | Some(1)));
        }
        // compete never touches fitness
        assert!(engine.population().iter().all(|i| i.fitness == 0));
    }

    #[test]
    fn test_run_keeps_population_size_and_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let engine = Evolver::random(Board::standard(), small_config(), &mut rng).unwrap();

        let mut seen = Vec::new();
        let result = engine.run(&mut rng, |stats| seen.push(stats.generation)).unwrap();

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.population.len(), 30);
        let champion = result.champion.unwrap();
        assert_eq!(champion.fitness, result.history[2].best_fitness);
        for stats in &result.history {
            assert!(stats.worst_fitness as f64 <= stats.avg_fitness);
            assert!(stats.avg_fitness <= stats.best_fitness as f64);
        }
    }

    #[test]
    fn test_run_is_reproducible() {
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let engine = Evolver::random(Board::standard(), small_config(), &mut rng).unwrap();
            engine.run(&mut rng, |_| {}).unwrap()
        };
        let a = run(5);
        let b = run(5);
        assert_eq!(a.population, b.population);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_generation_stats() {
        let mut population: Vec<Individual> =
            (0..4).map(|_| Individual::new(Genome::identity(9))).collect();
        for (ind, f) in population.iter_mut().zip([3, -1, 6, 0]) {
            ind.fitness = f;
        }
        let stats = GenerationStats::from_population(2, &population);
        assert_eq!(stats.best_fitness, 6);
        assert_eq!(stats.worst_fitness, -1);
        assert_eq!(stats.avg_fitness, 2.0);
    }

    #[test]
    fn test_mutation_rate_out_of_range_is_rejected() {
        for rate in [f64::NAN, -0.1, 1.5] {
            let config = EvolutionConfig {
                mutation_rate: rate,
                ..small_config()
            };
            assert!(matches!(
                config.validate(),
                Err(CoreError::InvalidMutationRate(_))
            ));
            assert!(Evolver::new(Vec::new(), Board::standard(), config).is_err());
        }
        assert!(small_config().validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"population_size": 64, "elitism": false}"#).unwrap();
        assert_eq!(config.population_size, 64);
        assert!(!config.elitism);
        assert_eq!(config.generations, 10);
    }
}
