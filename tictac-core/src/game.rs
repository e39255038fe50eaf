//! Game state machine driven by two move-priority genomes

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Mark};
use crate::error::{CoreError, Result};
use crate::genome::Genome;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Participant slot; `First` is the first genome handed to the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// First always plays X, second always plays O
    pub fn mark(self) -> Mark {
        match self {
            Player::First => Mark::X,
            Player::Second => Mark::O,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won(Player),
    Draw,
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::InProgress
    }

    /// Winner, `None` for a draw or an unfinished game
    pub fn winner(self) -> Option<Player> {
        match self {
            GameState::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// One ply of the move history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ply {
    pub player: Player,
    /// Cell marked, `None` when the player's list was exhausted
    pub cell: Option<usize>,
}

// ============================================================================
// GAME
// ============================================================================

/// A single game on a private board.
///
/// Genomes are borrowed read-only. Each player keeps its own cursor into its
/// genome; the cursor only moves forward and survives across turns, so a
/// player resumes scanning where its previous turn stopped.
#[derive(Clone, Debug)]
pub struct Game<'a> {
    board: Board,
    genomes: [&'a Genome; 2],
    cursors: [usize; 2],
    current: Player,
    first_mover: Player,
    remaining: usize,
    state: GameState,
    history: Vec<Ply>,
}

impl<'a> Game<'a> {
    /// New game with the first mover picked uniformly at random
    pub fn new<R: Rng + ?Sized>(
        first: &'a Genome,
        second: &'a Genome,
        board: Board,
        rng: &mut R,
    ) -> Result<Self> {
        let first_mover = if rng.gen_bool(0.5) {
            Player::First
        } else {
            Player::Second
        };
        Self::with_first_mover(first, second, board, first_mover)
    }

    /// New game with a fixed first mover (fully deterministic)
    pub fn with_first_mover(
        first: &'a Genome,
        second: &'a Genome,
        board: Board,
        first_mover: Player,
    ) -> Result<Self> {
        for genome in [first, second] {
            if genome.len() != board.cell_count() {
                return Err(CoreError::GenomeLengthMismatch {
                    genome_len: genome.len(),
                    cell_count: board.cell_count(),
                });
            }
        }

        let remaining = board.empty_count();
        Ok(Self {
            board,
            genomes: [first, second],
            cursors: [0, 0],
            current: first_mover,
            first_mover,
            remaining,
            state: if remaining == 0 {
                GameState::Draw
            } else {
                GameState::InProgress
            },
            history: Vec::with_capacity(remaining),
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn first_mover(&self) -> Player {
        self.first_mover
    }

    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    /// Cursor position of a player within its genome
    pub fn cursor(&self, player: Player) -> usize {
        self.cursors[player.index()]
    }

    /// Play until the game reaches a terminal state
    pub fn play(&mut self) -> Result<GameState> {
        while !self.state.is_over() {
            self.step()?;
        }
        Ok(self.state)
    }

    /// Advance by one ply
    pub fn step(&mut self) -> Result<GameState> {
        if self.state.is_over() {
            return Ok(self.state);
        }

        let player = self.current;
        let mark = player.mark();
        let cell = self.next_move(player);

        if let Some(index) = cell {
            let (row, col) = self.board.coords(index).ok_or(CoreError::OutOfBounds {
                row: index / self.board.cols(),
                col: index % self.board.cols(),
                rows: self.board.rows(),
                cols: self.board.cols(),
            })?;
            self.board.place(row, col, mark)?;
        } else {
            tracing::debug!(?player, "move list exhausted, ply skipped");
        }

        self.history.push(Ply { player, cell });
        self.remaining = self.remaining.saturating_sub(1);

        if cell.is_some() && self.board.is_winning_line(mark) {
            self.state = GameState::Won(player);
        } else if self.remaining == 0 {
            self.state = GameState::Draw;
        } else {
            self.current = player.opponent();
        }

        Ok(self.state)
    }

    /// Scan forward from the player's cursor to the first empty cell.
    ///
    /// Indices that do not address a board cell are skipped like occupied ones.
    fn next_move(&mut self, player: Player) -> Option<usize> {
        let genome = self.genomes[player.index()];
        let cursor = &mut self.cursors[player.index()];

        while let Some(index) = genome.get(*cursor) {
            *cursor += 1;
            if let Some((row, col)) = self.board.coords(index) {
                if self.board.is_empty_at(row, col) {
                    return Some(index);
                }
            }
        }
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
