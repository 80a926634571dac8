//! Gobblet rules engine: a stacking tic-tac-toe where larger pieces cover
//! smaller ones and a covered piece only counts once it is visible again.
//!
//! # Board Encoding (64-bit)
//!
//! ```text
//! Bits 0-53:  Board state (9 cells × 6 bits per cell)
//! Bits 54-63: Unused
//!
//! Each cell (6 bits) - indexed by SIZE, not stack position:
//!   Bits 0-1: Small piece owner (0=empty, 1=P1, 2=P2)
//!   Bits 2-3: Medium piece owner
//!   Bits 4-5: Large piece owner
//!
//! Cell indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! A stack only ever grows by a strictly larger piece, so the size layers
//! fully describe the bottom-to-top order of every cell.
//!
//! # Layers
//!
//! - [`Board`]: packed cells, visibility, win lines.
//! - [`Inventory`]: pieces each player still holds.
//! - [`Turn`]: whose move it is and any pending replacement obligation.
//! - [`GameState`]: the rule engine tying the three together.
//! - [`History`]: post-action snapshots and the move log.
//! - [`Session`]: the surface a presentation layer talks to.

use std::fmt;

use serde::Serialize;

pub mod board;
pub mod error;
pub mod history;
pub mod inventory;
pub mod rules;
pub mod session;
pub mod turn;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::Board;
pub use error::GameError;
pub use history::{History, MoveLog, Snapshot, UndoPolicy};
pub use inventory::{Inventory, PIECES_PER_SIZE};
pub use rules::{Action, Applied, GameState};
pub use session::{GameView, Response, Session, SessionConfig};
pub use turn::Turn;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Zero-based slot for per-player tables.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }

    /// Piece colour shown to the players.
    pub fn color(self) -> &'static str {
        match self {
            Player::One => "Red",
            Player::Two => "Blue",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// Ordering weight: Small=1, Medium=2, Large=3.
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        self.rank() > other.rank()
    }

    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            _ => None,
        }
    }

    /// Get all sizes as an iterator.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        })
    }
}

/// Position on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
///
/// Only [`Pos::new`] builds a position from outside the crate, so every `Pos`
/// a caller holds is on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Pos(pub(crate) u8);

impl Pos {
    /// Validate a raw cell index.
    pub fn new(index: usize) -> Result<Pos, GameError> {
        if index < 9 {
            Ok(Pos(index as u8))
        } else {
            Err(GameError::InvalidCell(index))
        }
    }

    /// Create a position from row and column (0-2 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Result<Pos, GameError> {
        if row < 3 && col < 3 {
            Ok(Pos(row * 3 + col))
        } else {
            Err(GameError::InvalidCell(row as usize * 3 + col as usize))
        }
    }

    /// Raw index (0-8).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }
}

/// Rendered 1-based as `row.col`, the notation used by the move log.
impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.row() + 1, self.col() + 1)
    }
}

/// A single piece. Size and owner never change once created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Piece {
    pub size: Size,
    pub owner: Player,
}

impl Piece {
    #[inline]
    pub fn new(owner: Player, size: Size) -> Piece {
        Piece { size, owner }
    }
}
