//! Play command - one game between two genomes given on the command line
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: parse_genomes(), play_game(), report_game()
//! - Level 3: parse_genes()
//! - Level 4: argument types

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tictac_core::{Board, Game, GameState, Genome, Player};

use crate::evolve::create_rng;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// First genome (plays X), comma separated cell indices
    #[arg(long, value_name = "GENES")]
    pub first: String,

    /// Second genome (plays O), comma separated cell indices
    #[arg(long, value_name = "GENES")]
    pub second: String,

    /// Who moves first
    #[arg(long, value_enum, default_value_t = FirstMover::Random)]
    pub first_mover: FirstMover,

    /// Board rows
    #[arg(long, default_value = "3")]
    pub rows: usize,

    /// Board columns
    #[arg(long, default_value = "3")]
    pub cols: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FirstMover {
    First,
    Second,
    Random,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let board = Board::new(args.rows, args.cols)
        .with_context(|| format!("Invalid board {}x{}", args.rows, args.cols))?;
    let (first, second) = parse_genomes(&args, board.cell_count())?;

    let game = play_game(&first, &second, board, args.first_mover, seed)?;

    report_game(&game);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn parse_genomes(args: &PlayArgs, cell_count: usize) -> Result<(Genome, Genome)> {
    let first = parse_genes(&args.first, cell_count).context("Invalid --first genome")?;
    let second = parse_genes(&args.second, cell_count).context("Invalid --second genome")?;
    Ok((first, second))
}

fn play_game<'a>(
    first: &'a Genome,
    second: &'a Genome,
    board: Board,
    first_mover: FirstMover,
    seed: Option<u64>,
) -> Result<Game<'a>> {
    let mut game = match first_mover {
        FirstMover::First => Game::with_first_mover(first, second, board, Player::First)?,
        FirstMover::Second => Game::with_first_mover(first, second, board, Player::Second)?,
        FirstMover::Random => Game::new(first, second, board, &mut create_rng(seed))?,
    };

    let state = game.play()?;
    tracing::debug!(?state, plies = game.history().len(), "game finished");

    Ok(game)
}

fn report_game(game: &Game<'_>) {
    println!("First mover: {}", seat_name(game.first_mover()));

    for (i, ply) in game.history().iter().enumerate() {
        match ply.cell {
            Some(cell) => println!(
                "{:>2}. {} ({}) -> {}",
                i + 1,
                seat_name(ply.player),
                ply.player.mark().symbol(),
                cell
            ),
            None => println!("{:>2}. {} passes", i + 1, seat_name(ply.player)),
        }
    }

    println!("\n{}", game.board());

    match game.state() {
        GameState::Won(player) => println!("Winner: {}", seat_name(player)),
        GameState::Draw => println!("Draw"),
        GameState::InProgress => println!("Unfinished"),
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Parse `0,4,8,...` (brackets and spaces allowed) into a validated genome
fn parse_genes(text: &str, cell_count: usize) -> Result<Genome> {
    let cells = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|g| {
            g.trim()
                .parse::<usize>()
                .with_context(|| format!("Not a cell index: {:?}", g.trim()))
        })
        .collect::<Result<Vec<usize>>>()?;

    Ok(Genome::new(cells, cell_count)?)
}

fn seat_name(player: Player) -> &'static str {
    match player {
        Player::First => "first",
        Player::Second => "second",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genes() {
        let genome = parse_genes("0,8,1,7,2,6,3,5,4", 9).unwrap();
        assert_eq!(genome.as_slice(), &[0, 8, 1, 7, 2, 6, 3, 5, 4]);

        let genome = parse_genes("[2, 1, 0]", 3).unwrap();
        assert_eq!(genome.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_parse_genes_rejects_bad_input() {
        assert!(parse_genes("0,1,x", 3).is_err());
        assert!(parse_genes("0,1,1", 3).is_err());
        assert!(parse_genes("0,1", 3).is_err());
    }

    #[test]
    fn test_play_game_fixed_first_mover() {
        let first = parse_genes("0,1,2,3,4,5,6,7,8", 9).unwrap();
        let second = parse_genes("8,7,6,5,4,3,2,1,0", 9).unwrap();

        let game = play_game(&first, &second, Board::standard(), FirstMover::First, None).unwrap();
        assert_eq!(game.state(), GameState::Won(Player::First));
        assert_eq!(game.history().len(), 5);
    }
}
