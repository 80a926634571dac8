//! Packed 3x3 board of piece stacks.
//!
//! See the crate documentation for the bit layout. The board performs no rule
//! validation: callers decide whether a push is legal before making it.

use crate::{GameError, Piece, Player, Pos, Size};

/// Compact board state - fits in a single u64.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Board(u64);

impl Board {
    /// Bits per cell (6 bits = 3 sizes × 2 bits each).
    const CELL_BITS: u32 = 6;
    /// Mask for a single cell (0b111111).
    const CELL_MASK: u64 = 0b111111;
    /// Mask for a single layer (2 bits for player: 0=empty, 1=P1, 2=P2).
    const LAYER_MASK: u64 = 0b11;

    /// The 8 winning lines, in scan order: rows, columns, diagonals.
    pub const WIN_LINES: [[Pos; 3]; 8] = [
        [Pos(0), Pos(1), Pos(2)], // Row 0
        [Pos(3), Pos(4), Pos(5)], // Row 1
        [Pos(6), Pos(7), Pos(8)], // Row 2
        [Pos(0), Pos(3), Pos(6)], // Col 0
        [Pos(1), Pos(4), Pos(7)], // Col 1
        [Pos(2), Pos(5), Pos(8)], // Col 2
        [Pos(0), Pos(4), Pos(8)], // Main diagonal
        [Pos(2), Pos(4), Pos(6)], // Anti-diagonal
    ];

    /// Create a new empty board.
    #[inline]
    pub fn new() -> Board {
        Board(0)
    }

    /// Get the raw u64 encoding.
    #[inline]
    pub fn to_u64(self) -> u64 {
        self.0
    }

    /// Get the 6 bits for a cell at the given position.
    #[inline]
    fn cell(&self, pos: Pos) -> u64 {
        (self.0 >> (pos.0 as u32 * Self::CELL_BITS)) & Self::CELL_MASK
    }

    /// Set the 6 bits for a cell at the given position.
    #[inline]
    fn set_cell(&mut self, pos: Pos, value: u64) {
        let shift = pos.0 as u32 * Self::CELL_BITS;
        self.0 = (self.0 & !(Self::CELL_MASK << shift)) | ((value & Self::CELL_MASK) << shift);
    }

    /// Owner bits of one size layer in a cell.
    #[inline]
    fn layer(cell: u64, size: Size) -> Option<Player> {
        Player::from_bits(((cell >> (size as u32 * 2)) & Self::LAYER_MASK) as u8)
    }

    /// Get the top (visible) piece at a position.
    /// Checks Large, then Medium, then Small.
    #[inline]
    pub fn top_of(&self, pos: Pos) -> Option<Piece> {
        let cell = self.cell(pos);
        [Size::Large, Size::Medium, Size::Small]
            .into_iter()
            .find_map(|size| Self::layer(cell, size).map(|owner| Piece::new(owner, size)))
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cell(pos) == 0
    }

    /// All pieces in a cell, bottom to top.
    pub fn stack(&self, pos: Pos) -> Vec<Piece> {
        let cell = self.cell(pos);
        Size::all()
            .filter_map(|size| Self::layer(cell, size).map(|owner| Piece::new(owner, size)))
            .collect()
    }

    /// Add a piece to a cell (push onto stack).
    /// The piece becomes visible (on top).
    /// Does NOT validate - caller must ensure the piece covers the current top.
    #[inline]
    pub fn push(&mut self, pos: Pos, piece: Piece) {
        debug_assert!(
            self.can_place(piece.size, pos),
            "{:?} cannot cover the top of cell {}",
            piece,
            pos
        );
        let cell = self.cell(pos);
        let layer_shift = (piece.size as u32) * 2;
        let new_cell =
            (cell & !(Self::LAYER_MASK << layer_shift)) | ((piece.owner as u64) << layer_shift);
        self.set_cell(pos, new_cell);
    }

    /// Remove the top piece from a cell, revealing whatever it covered.
    pub fn pop(&mut self, pos: Pos) -> Result<Piece, GameError> {
        let top = self.top_of(pos).ok_or(GameError::EmptyCell(pos))?;
        let layer_shift = (top.size as u32) * 2;
        let cell = self.cell(pos) & !(Self::LAYER_MASK << layer_shift);
        self.set_cell(pos, cell);
        Ok(top)
    }

    /// Check if a piece of the given size can be placed at this position.
    /// A piece can be placed if the cell is empty or the top piece is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        match self.top_of(pos) {
            None => true,
            Some(top) => size.can_gobble(top.size),
        }
    }

    /// Count pieces of each size on board for a player, covered ones included.
    /// Returns [small_count, medium_count, large_count].
    pub fn pieces_on_board(&self, player: Player) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for pos in Pos::all() {
            let cell = self.cell(pos);
            for size in Size::all() {
                if Self::layer(cell, size) == Some(player) {
                    counts[size as usize] += 1;
                }
            }
        }
        counts
    }

    // ========== Win Detection ==========

    /// First line (in `WIN_LINES` order) whose three visible pieces share an
    /// owner. Simultaneous lines are not arbitrated: the earliest one wins.
    pub fn winning_line(&self) -> Option<(Player, [Pos; 3])> {
        Self::WIN_LINES.iter().find_map(|line| {
            let owner = self.top_of(line[0])?.owner;
            line[1..]
                .iter()
                .all(|&pos| self.top_of(pos).map(|p| p.owner) == Some(owner))
                .then_some((owner, *line))
        })
    }

    /// Owner of the first complete line, if any.
    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winning_line().map(|(owner, _)| owner)
    }
}
