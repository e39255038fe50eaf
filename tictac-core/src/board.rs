//! Rectangular board with cell occupancy and win-line checks

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Side length of the classic board
pub const STANDARD_SIZE: usize = 3;

/// Mark placed by a player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// Board state (clone to get a private copy for a game)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major cells, `None` when empty
    cells: Vec<Option<Mark>>,
}

impl Board {
    /// Create an empty `rows x cols` board
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidBoard { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    /// Empty 3x3 board
    pub fn standard() -> Self {
        Self {
            rows: STANDARD_SIZE,
            cols: STANDARD_SIZE,
            cells: vec![None; STANDARD_SIZE * STANDARD_SIZE],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells (genome length for this board)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Convert a linear cell index into (row, col)
    pub fn coords(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.cells.len()).then(|| (index / self.cols, index % self.cols))
    }

    /// Mark at (row, col), `None` when empty or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.offset(row, col).and_then(|i| self.cells[i])
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.offset(row, col), Some(i) if self.cells[i].is_none())
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Option<Mark>] {
        &self.cells
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Place `mark` on an empty cell.
    ///
    /// Marking an occupied cell is an engine bug, so it is reported as an error
    /// instead of being silently overwritten.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<()> {
        let i = self.offset(row, col).ok_or(CoreError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })?;
        if self.cells[i].is_some() {
            return Err(CoreError::CellOccupied { row, col });
        }
        self.cells[i] = Some(mark);
        Ok(())
    }

    /// Check rows, columns and both diagonals for a full line of `mark`.
    ///
    /// Diagonals only exist on square boards.
    pub fn is_winning_line(&self, mark: Mark) -> bool {
        let owned = |row: usize, col: usize| self.cells[row * self.cols + col] == Some(mark);

        for row in 0..self.rows {
            if (0..self.cols).all(|col| owned(row, col)) {
                return true;
            }
        }
        for col in 0..self.cols {
            if (0..self.rows).all(|row| owned(row, col)) {
                return true;
            }
        }

        if self.rows == self.cols {
            let n = self.rows;
            if (0..n).all(|i| owned(i, i)) {
                return true;
            }
            if (0..n).all(|i| owned(i, n - 1 - i)) {
                return true;
            }
        }

        false
    }

    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(self.cols * 2 - 1);
        for row in self.cells.chunks(self.cols) {
            let line: Vec<String> = row
                .iter()
                .map(|c| c.map_or(' ', Mark::symbol).to_string())
                .collect();
            writeln!(f, "{}", line.join("|"))?;
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}
