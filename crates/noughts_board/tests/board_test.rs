//! Property-style tests for the board engine.

use noughts_board::rules::LINES;
use noughts_board::{Board, BoardError, Cell, Coord, Mark};
use strum::IntoEnumIterator;

#[test]
fn test_place_succeeds_once_per_cell() {
    for mark in Mark::iter() {
        let mut board = Board::new();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(board.place(row, col, mark), Ok(()));
                assert_eq!(
                    board.place(row, col, mark.opponent()),
                    Err(BoardError::CellOccupied)
                );
                let coord = Coord::new(row, col).unwrap();
                assert_eq!(board.get(coord), Cell::Marked(mark));
            }
        }
        assert!(board.is_full());
    }
}

#[test]
fn test_out_of_bounds_leaves_board_unmutated() {
    let mut board = Board::new();
    board.place(1, 1, Mark::X).unwrap();
    let before = board.clone();

    for (row, col) in [(-1, 0), (0, -1), (3, 0), (0, 3), (3, 3), (-5, 9), (i64::MAX, 0)] {
        assert_eq!(board.place(row, col, Mark::O), Err(BoardError::OutOfBounds));
    }
    assert_eq!(board, before);
}

#[test]
fn test_every_line_wins() {
    for mark in Mark::iter() {
        for line in LINES {
            let mut board = Board::new();
            for (row, col) in line {
                board.place(row as i64, col as i64, mark).unwrap();
            }
            assert_eq!(board.winner(), Some(mark), "line {line:?}");
            assert!(!board.is_draw());
        }
    }
}

#[test]
fn test_no_line_no_winner() {
    let mut board = Board::new();
    board.place(0, 0, Mark::X).unwrap();
    board.place(0, 1, Mark::O).unwrap();
    board.place(1, 1, Mark::X).unwrap();
    board.place(2, 2, Mark::O).unwrap();
    assert_eq!(board.winner(), None);
    assert_eq!(board.filled(), 4);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut board = Board::new();
    let plays = [
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (0, 2, Mark::X),
        (1, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 2, Mark::O),
        (2, 1, Mark::X),
        (2, 0, Mark::O),
        (2, 2, Mark::X),
    ];
    for (row, col, mark) in plays {
        board.place(row, col, mark).unwrap();
    }
    assert_eq!(board.winner(), None);
    assert!(board.is_draw());
}

#[test]
fn test_full_board_with_winner_reports_winner() {
    let mut board = Board::new();
    let plays = [
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (0, 2, Mark::X),
        (1, 0, Mark::O),
        (1, 1, Mark::X),
        (1, 2, Mark::O),
        (2, 1, Mark::X),
        (2, 0, Mark::O),
        (2, 2, Mark::X),
    ];
    for (row, col, mark) in plays {
        board.place(row, col, mark).unwrap();
    }
    assert!(board.is_full());
    assert_eq!(board.winner(), Some(Mark::X));
    assert!(!board.is_draw());
}
