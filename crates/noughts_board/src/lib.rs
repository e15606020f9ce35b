//! Noughts board engine - pure 3x3 tic-tac-toe rules.
//!
//! The board knows nothing about players, connections or turns. It applies a
//! mark to a cell, and answers whether a line of three has been completed or
//! the grid has filled up.
//!
//! # Example
//!
//! ```
//! use noughts_board::{Board, Mark};
//!
//! let mut board = Board::new();
//! board.place(0, 0, Mark::X).unwrap();
//! board.place(1, 1, Mark::X).unwrap();
//! board.place(2, 2, Mark::X).unwrap();
//! assert_eq!(board.winner(), Some(Mark::X));
//! assert!(!board.is_draw());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod rules;
mod types;

pub use error::BoardError;
pub use types::{BOARD_SIZE, Board, Cell, Coord, Mark};
