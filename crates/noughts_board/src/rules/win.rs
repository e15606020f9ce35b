//! Win detection logic for tic-tac-toe.

use crate::{BOARD_SIZE, Board, Cell, Mark};
use tracing::instrument;

/// The eight winning lines as (row, col) triples: rows, columns, diagonals.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if that mark fills a whole line, `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    let cell = |(row, col): (usize, usize)| board.cells()[row * BOARD_SIZE + col];

    LINES.iter().find_map(|&[a, b, c]| match cell(a) {
        Cell::Marked(mark) if cell(b) == Cell::Marked(mark) && cell(c) == Cell::Marked(mark) => {
            Some(mark)
        }
        _ => None,
    })
}
