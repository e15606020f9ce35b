//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). The board methods
//! `winner`, `is_full` and `is_draw` delegate here.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};
