//! Rank command - round-robin standings for a saved population
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_ranked_population(), report_standings()
//! - Level 3: standing_rows()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tictac_core::{load_numbered_population, Board, Individual};
use tictac_tournament::{run_round_robin, Standing};

use crate::evolve::{create_rng, format_genes};

#[derive(Args)]
pub struct RankArgs {
    /// Population checkpoint to rank
    #[arg(long, value_name = "FILE", default_value = "results/final_population.txt")]
    pub checkpoint: PathBuf,

    /// Individuals read from the checkpoint
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Games per pairing
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Standings to print
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Board rows
    #[arg(long, default_value = "3")]
    pub rows: usize,

    /// Board columns
    #[arg(long, default_value = "3")]
    pub cols: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run rank command
pub fn run(args: RankArgs, seed: Option<u64>) -> Result<()> {
    let template = Board::new(args.rows, args.cols)
        .with_context(|| format!("Invalid board {}x{}", args.rows, args.cols))?;
    let ranked = load_ranked_population(&args, &template)?;

    tracing::info!(
        "Round robin: {} individuals, {} games per pairing",
        ranked.individuals.len(),
        args.games
    );

    let mut rng = create_rng(seed);
    let standings = run_round_robin(&ranked.individuals, &template, args.games, &mut rng)?;

    report_standings(&standing_rows(&standings, &ranked, args.top), args.json)
}

/// Individuals read from a checkpoint with the file line each came from
struct RankedPopulation {
    lines: Vec<usize>,
    individuals: Vec<Individual>,
}

#[derive(Debug, serde::Serialize)]
struct StandingRow {
    rank: usize,
    /// 1-based checkpoint line
    line: usize,
    wins: u32,
    losses: u32,
    draws: u32,
    points: i64,
    win_rate: f32,
    genes: Vec<usize>,
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_ranked_population(args: &RankArgs, template: &Board) -> Result<RankedPopulation> {
    let numbered = load_numbered_population(&args.checkpoint, args.limit, template.cell_count())
        .with_context(|| format!("Failed to read checkpoint {}", args.checkpoint.display()))?;

    if numbered.len() < 2 {
        anyhow::bail!(
            "Need at least two individuals to rank, found {} in {}",
            numbered.len(),
            args.checkpoint.display()
        );
    }

    let (lines, individuals) = numbered.into_iter().unzip();
    Ok(RankedPopulation { lines, individuals })
}

fn report_standings(rows: &[StandingRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!("\n=== Standings ===");
    println!(
        "{:>4} {:>6} {:>4} {:>4} {:>4} {:>7} {:>6}  genes",
        "rank", "line", "W", "L", "D", "points", "win%"
    );
    for row in rows {
        println!(
            "{:>4} {:>6} {:>4} {:>4} {:>4} {:>7} {:>5.1}%  {}",
            row.rank,
            row.line,
            row.wins,
            row.losses,
            row.draws,
            row.points,
            row.win_rate * 100.0,
            format_genes(&row.genes)
        );
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Top `top` standings mapped back to checkpoint lines and genomes
fn standing_rows(standings: &[Standing], ranked: &RankedPopulation, top: usize) -> Vec<StandingRow> {
    standings
        .iter()
        .take(top)
        .enumerate()
        .map(|(rank, s)| StandingRow {
            rank: rank + 1,
            line: ranked.lines[s.index],
            wins: s.wins,
            losses: s.losses,
            draws: s.draws,
            points: s.points,
            win_rate: s.win_rate(),
            genes: ranked.individuals[s.index].genome().as_slice().to_vec(),
        })
        .collect()
}
