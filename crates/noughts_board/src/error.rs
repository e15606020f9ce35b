//! Board error types.

use derive_more::{Display, Error};

/// Reasons a mark cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Row or column is outside `0..=2`.
    #[display("out of bounds")]
    OutOfBounds,
    /// The target cell already holds a mark.
    #[display("occupied")]
    CellOccupied,
}
