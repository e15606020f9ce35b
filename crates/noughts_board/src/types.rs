//! Core domain types for the board.

use crate::error::BoardError;
use crate::rules;
use tracing::instrument;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: usize = 3;

/// Symbol a player places.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Holds a mark. Never reverts to `Empty`.
    Marked(Mark),
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Marked(Mark::X) => 'X',
            Cell::Marked(Mark::O) => 'O',
        }
    }
}

/// A validated board coordinate.
///
/// Construction fails for anything outside `0..=2`, so a `Coord` in hand is
/// always addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Creates a coordinate, rejecting negative or too-large values.
    pub fn new(row: i64, col: i64) -> Result<Self, BoardError> {
        let in_range = |v: i64| (0..BOARD_SIZE as i64).contains(&v);
        if !in_range(row) || !in_range(col) {
            return Err(BoardError::OutOfBounds);
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Row index (0-2).
    pub fn row(self) -> usize {
        usize::from(self.row)
    }

    /// Column index (0-2).
    pub fn col(self) -> usize {
        usize::from(self.col)
    }

    /// Row-major index (0-8).
    pub fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; BOARD_SIZE * BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given coordinate.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; BOARD_SIZE * BOARD_SIZE] {
        &self.cells
    }

    /// Writes `mark` at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// - [`BoardError::OutOfBounds`] if either index is outside `0..=2`.
    /// - [`BoardError::CellOccupied`] if the cell already holds a mark.
    ///
    /// The board is left untouched on error.
    #[instrument(skip(self))]
    pub fn place(&mut self, row: i64, col: i64, mark: Mark) -> Result<(), BoardError> {
        let coord = Coord::new(row, col)?;
        self.place_at(coord, mark)
    }

    /// Writes `mark` at an already validated coordinate.
    pub fn place_at(&mut self, coord: Coord, mark: Mark) -> Result<(), BoardError> {
        let cell = &mut self.cells[coord.index()];
        if *cell != Cell::Empty {
            return Err(BoardError::CellOccupied);
        }
        *cell = Cell::Marked(mark);
        Ok(())
    }

    /// Returns the mark completing a row, column or diagonal, if any.
    pub fn winner(&self) -> Option<Mark> {
        rules::check_winner(self)
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// True when the board is full and nobody has a line.
    pub fn is_draw(&self) -> bool {
        rules::is_draw(self)
    }

    /// Number of marks placed so far.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Formats the board as three text rows, `.` for empty cells.
    pub fn render(&self) -> String {
        self.cells
            .chunks(BOARD_SIZE)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
