//! tictac CLI - Command-line interface
//!
//! Commands:
//! - evolve: Evolve move-priority strategies with a genetic algorithm
//! - play: Play a single game between two genomes
//! - rank: Round-robin standings for a saved population

mod evolve;
mod play_cmd;
mod rank;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tictac")]
#[command(about = "Co-evolve tic-tac-toe move-priority strategies")]
struct Cli {
    /// Seed for the random number generator (entropy when absent)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the genetic algorithm
    Evolve(evolve::EvolveArgs),
    /// Play a single game between two genomes
    Play(play_cmd::PlayArgs),
    /// Rank a saved population by round-robin play
    Rank(rank::RankArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evolve(args) => evolve::run(args, cli.seed),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Rank(args) => rank::run(args, cli.seed),
    }
}
