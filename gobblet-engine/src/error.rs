//! Rejection reasons for engine operations.
//!
//! Every variant is a local validation failure: the state is untouched and
//! the session stays usable.

use thiserror::Error;

use crate::{Player, Pos, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Cell index outside 0-8.
    #[error("cell {0} is not on the board")]
    InvalidCell(usize),
    /// Tried to lift a piece from an empty cell.
    #[error("cell {0} is empty")]
    EmptyCell(Pos),
    /// A placement was requested without choosing a size.
    #[error("choose a piece size first")]
    NoSizeSelected,
    /// A reclaimed piece is pending and a different size was chosen.
    #[error("place the reclaimed {required} piece first (selected {selected})")]
    ObligationMismatch { required: Size, selected: Size },
    /// A second reclaim was attempted before the first was replaced.
    #[error("the reclaimed {0} piece must be placed before reclaiming another")]
    ObligationPending(Size),
    /// The player has no pieces of that size left in hand.
    #[error("{player} has no {size} pieces left")]
    InventoryExhausted { player: Player, size: Size },
    /// Equal or smaller pieces cannot cover.
    #[error("a {size} piece cannot cover a {top} piece")]
    IllegalCover { size: Size, top: Size },
    /// Reclaim or self-cover on a cell whose visible piece is not the mover's.
    #[error("the piece on {0} does not belong to the current player")]
    NotYourPiece(Pos),
    /// The caller named a player who is not on move.
    #[error("it is {expected}'s turn")]
    NotYourTurn { expected: Player },
    /// A mutating action after the game has been won.
    #[error("the game has already ended")]
    GameAlreadyEnded,
}
