//! Evolution command - run the genetic algorithm over move-priority genomes
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_evolution_config(), create_evolver(), run_evolution(), save_results()
//! - Level 3: config_from_args(), load_config_file(), save_fitness_history(), print_json_results()
//! - Level 4: RNG creation, formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tictac_core::{load_population, save_population, Board, Genome};
use tictac_evolve::{EvolutionConfig, EvolutionResult, Evolver, GenerationStats};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct EvolveArgs {
    /// Population size
    #[arg(long, default_value = "10000")]
    pub population: usize,

    /// Number of generations to run
    #[arg(long, default_value = "10")]
    pub generations: usize,

    /// Probability of a swap mutation per offspring (0.0-1.0)
    #[arg(long, default_value = "0.04")]
    pub mutation_rate: f64,

    /// Do not carry the best individual into the next generation
    #[arg(long)]
    pub no_elitism: bool,

    /// Games each individual plays per generation
    #[arg(long, default_value = "5")]
    pub games: usize,

    /// Board rows
    #[arg(long, default_value = "3")]
    pub rows: usize,

    /// Board columns
    #[arg(long, default_value = "3")]
    pub cols: usize,

    /// Contestants per selection tournament
    #[arg(long, default_value = "5")]
    pub tournament_size: usize,

    /// Population checkpoint, loaded at start and written at the end
    #[arg(long, value_name = "FILE", default_value = "results/final_population.txt")]
    pub checkpoint: PathBuf,

    /// Output directory for the fitness history
    #[arg(long, default_value = "evolution_output")]
    pub output: PathBuf,

    /// JSON evolution config; replaces the flag values above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Evaluate on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run evolution command
///
/// This function reads like a table of contents:
/// 1. Set up evolution configuration
/// 2. Load initial population
/// 3. Run evolution loop
/// 4. Save results
pub fn run(args: EvolveArgs, seed: Option<u64>) -> Result<()> {
    let config = build_evolution_config(&args)?;
    let template = config
        .board()
        .with_context(|| format!("Invalid board {}x{}", config.rows, config.cols))?;
    let mut rng = create_rng(seed);

    tracing::info!(
        "Starting evolution: pop={}, gen={}, games={}, board={}x{}",
        config.population_size,
        config.generations,
        config.games_per_individual,
        config.rows,
        config.cols
    );

    let evolver = create_evolver(&args.checkpoint, &config, template, &mut rng)?;
    let result = run_evolution(evolver, &config, &mut rng)?;

    save_results(&result, &config, &args)?;

    print_summary(&result, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build evolution configuration from a config file or the command arguments
fn build_evolution_config(args: &EvolveArgs) -> Result<EvolutionConfig> {
    let config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => config_from_args(args),
    };
    config.validate().context("Invalid evolution config")?;
    Ok(config)
}

/// Engine seeded from the checkpoint, or from a random population when it is missing or empty
fn create_evolver(
    checkpoint: &Path,
    config: &EvolutionConfig,
    template: Board,
    rng: &mut ChaCha8Rng,
) -> Result<Evolver> {
    let population = load_population(checkpoint, config.population_size, template.cell_count())
        .with_context(|| format!("Failed to read checkpoint {}", checkpoint.display()))?;

    if population.is_empty() {
        tracing::info!("Initial population: {} random individuals", config.population_size);
        return Evolver::random(template, config.clone(), rng).context("Failed to create population");
    }

    tracing::info!(
        "Initial population: {} individuals loaded from {}",
        population.len(),
        checkpoint.display()
    );
    Evolver::new(population, template, config.clone())
        .context("Initial population does not fit the board")
}

/// Run the evolution loop with a progress bar
fn run_evolution(
    evolver: Evolver,
    config: &EvolutionConfig,
    rng: &mut ChaCha8Rng,
) -> Result<EvolutionResult> {
    let bar = ProgressBar::new(config.generations as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} generations {msg}")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let callback = |stats: &GenerationStats| {
        bar.suspend(|| {
            tracing::info!(
                "Generation {}/{}: best={}, avg={:.3}, worst={}",
                stats.generation + 1,
                config.generations,
                stats.best_fitness,
                stats.avg_fitness,
                stats.worst_fitness
            );
        });
        bar.set_message(format!("best={}", stats.best_fitness));
        bar.inc(1);
    };

    let result = evolver.run(rng, callback).context("Evolution failed")?;
    bar.finish_and_clear();

    Ok(result)
}

/// Save checkpoint and fitness history
fn save_results(result: &EvolutionResult, config: &EvolutionConfig, args: &EvolveArgs) -> Result<()> {
    save_population(&args.checkpoint, &result.population)
        .with_context(|| format!("Failed to save checkpoint {}", args.checkpoint.display()))?;
    tracing::info!("Saved population to {}", args.checkpoint.display());

    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;
    save_fitness_history(&result.history, &args.output)?;

    if args.json {
        print_json_results(result, config)?;
    }

    Ok(())
}

/// Print summary to console
fn print_summary(result: &EvolutionResult, args: &EvolveArgs) {
    println!("\n=== Evolution Complete ===");
    println!("Generations: {}", result.history.len());

    match &result.champion {
        Some(best) => {
            println!("Best genes: {}", format_genes(best.genome().as_slice()));
            println!("Best fitness: {}", best.fitness);
        }
        None => println!("No individual was evaluated"),
    }

    if let Some(last) = result.history.last() {
        println!("Final avg fitness: {:.4}", last.avg_fitness);
    }
    println!("Checkpoint: {}", args.checkpoint.display());
    println!("Output directory: {}", args.output.display());
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn config_from_args(args: &EvolveArgs) -> EvolutionConfig {
    EvolutionConfig {
        population_size: args.population,
        generations: args.generations,
        mutation_rate: args.mutation_rate,
        elitism: !args.no_elitism,
        games_per_individual: args.games,
        tournament_size: args.tournament_size,
        rows: args.rows,
        cols: args.cols,
        parallel: !args.sequential,
    }
}

/// Read an `EvolutionConfig` from JSON; missing fields take their defaults
fn load_config_file(path: &Path) -> Result<EvolutionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: EvolutionConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    tracing::info!("Loaded evolution config from {}", path.display());
    Ok(config)
}

/// Save fitness history to CSV
fn save_fitness_history(history: &[GenerationStats], output: &Path) -> Result<()> {
    let path = output.join("fitness_history.csv");
    std::fs::write(&path, format_fitness_history(history))
        .context("Failed to write fitness history")?;
    tracing::info!("Saved fitness history to {}", path.display());

    Ok(())
}

/// Print JSON results to stdout
fn print_json_results(result: &EvolutionResult, config: &EvolutionConfig) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        timestamp: DateTime<Utc>,
        generations_run: usize,
        best_fitness: Option<i64>,
        best_genome: Option<&'a Genome>,
        final_avg_fitness: Option<f64>,
        config: &'a EvolutionConfig,
    }

    let output = JsonOutput {
        timestamp: Utc::now(),
        generations_run: result.history.len(),
        best_fitness: result.champion.as_ref().map(|c| c.fitness),
        best_genome: result.champion.as_ref().map(|c| c.genome()),
        final_avg_fitness: result.history.last().map(|s| s.avg_fitness),
        config,
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// `[a, b, c]` rendering used in the summary
pub(crate) fn format_genes(genes: &[usize]) -> String {
    let cells: Vec<String> = genes.iter().map(|c| c.to_string()).collect();
    format!("[{}]", cells.join(", "))
}

fn format_fitness_history(history: &[GenerationStats]) -> String {
    let mut content = String::from("generation,best_fitness,avg_fitness,worst_fitness\n");
    for stats in history {
        content.push_str(&format!(
            "{},{},{:.4},{}\n",
            stats.generation + 1,
            stats.best_fitness,
            stats.avg_fitness,
            stats.worst_fitness
        ));
    }
    content
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn default_args() -> EvolveArgs {
        EvolveArgs {
            population: 20,
            generations: 2,
            mutation_rate: 0.04,
            no_elitism: false,
            games: 3,
            rows: 3,
            cols: 3,
            tournament_size: 5,
            checkpoint: PathBuf::from("unused.txt"),
            output: PathBuf::from("test"),
            config: None,
            sequential: false,
            json: false,
        }
    }

    #[test]
    fn test_build_config_from_args() {
        let mut args = default_args();
        args.no_elitism = true;
        args.sequential = true;

        let config = build_evolution_config(&args).unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.games_per_individual, 3);
        assert!(!config.elitism);
        assert!(!config.parallel);
    }

    #[test]
    fn test_build_config_from_file() {
        let path = std::env::temp_dir().join(format!("tictac_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"population_size": 7, "mutation_rate": 0.5}"#).unwrap();

        let mut args = default_args();
        args.config = Some(path.clone());
        let config = build_evolution_config(&args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.population_size, 7);
        assert_eq!(config.mutation_rate, 0.5);
        assert_eq!(config.generations, EvolutionConfig::default().generations);
    }

    #[test]
    fn test_missing_checkpoint_gives_random_population() {
        let config = EvolutionConfig {
            population_size: 12,
            ..Default::default()
        };
        let mut rng = create_rng(Some(3));
        let evolver = create_evolver(
            Path::new("/nonexistent/tictac/checkpoint.txt"),
            &config,
            Board::standard(),
            &mut rng,
        )
        .unwrap();

        let population = evolver.population();
        assert_eq!(population.len(), 12);
        assert!(population.iter().all(|i| i.genome().validate(9).is_ok()));
    }

    #[test]
    fn test_bad_mutation_rate_is_rejected() {
        for rate in [f64::NAN, -0.5, 2.0] {
            let mut args = default_args();
            args.mutation_rate = rate;
            assert!(build_evolution_config(&args).is_err());
        }
    }

    #[test]
    fn test_bad_mutation_rate_in_config_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("tictac_bad_rate_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"mutation_rate": 1.5}"#).unwrap();

        let mut args = default_args();
        args.config = Some(path.clone());
        let result = build_evolution_config(&args);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_create_rng_with_seed() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_format_fitness_history() {
        let history = vec![
            GenerationStats {
                generation: 0,
                best_fitness: 5,
                avg_fitness: 0.5,
                worst_fitness: -5,
            },
            GenerationStats {
                generation: 1,
                best_fitness: 9,
                avg_fitness: 1.25,
                worst_fitness: -3,
            },
        ];
        let csv = format_fitness_history(&history);
        assert_eq!(
            csv,
            "generation,best_fitness,avg_fitness,worst_fitness\n1,5,0.5000,-5\n2,9,1.2500,-3\n"
        );
    }

    #[test]
    fn test_format_genes() {
        assert_eq!(format_genes(Genome::identity(3).as_slice()), "[0, 1, 2]");
    }
}
