//! Rule engine: turns a click into an action, validates it, applies it.
//!
//! Validation never mutates, and `apply` validates before touching anything,
//! so a rejected action leaves the state exactly as it was.

use crate::{Board, GameError, Inventory, Piece, Player, Pos, Size, Turn};

/// A fully resolved player interaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// Put a piece from hand on an empty cell or over a smaller piece.
    Place { size: Size, to: Pos },
    /// Put a larger piece from hand over one of the mover's own pieces.
    Cover { size: Size, at: Pos },
    /// Lift the mover's own visible piece back into hand.
    Reclaim { from: Pos },
}

impl Action {
    /// The cell the action touches.
    pub fn cell(&self) -> Pos {
        match *self {
            Action::Place { to, .. } => to,
            Action::Cover { at, .. } => at,
            Action::Reclaim { from } => from,
        }
    }
}

/// What an accepted action did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Applied {
    pub action: Action,
    /// Who acted.
    pub player: Player,
    /// Size of the piece that moved.
    pub size: Size,
    /// Set when this placement put the reclaimed piece back down, naming the
    /// cell it was lifted from.
    pub replaced_from: Option<Pos>,
    /// Set when the action ended the game.
    pub winner: Option<Player>,
}

impl Applied {
    /// Move log line.
    pub fn describe(&self) -> String {
        let (player, size) = (self.player, self.size);
        match (self.action, self.replaced_from) {
            (Action::Reclaim { from }, _) => format!("{player} reclaimed {size} from {from}"),
            (Action::Place { to, .. } | Action::Cover { at: to, .. }, Some(from)) => {
                format!("{player} moved {size} from {from} to {to}")
            }
            (Action::Place { to, .. }, None) => format!("{player} placed {size} on {to}"),
            (Action::Cover { at, .. }, None) => format!("{player} stacked {size} on {at}"),
        }
    }
}

/// Everything a rule decision depends on. `Copy`, so a snapshot is a plain
/// value copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GameState {
    pub board: Board,
    pub inventory: Inventory,
    pub turn: Turn,
}

impl GameState {
    /// Empty board, full hands, player 1 to move.
    pub fn new() -> GameState {
        GameState::default()
    }

    /// Resolve a click on `at` given the size currently selected.
    ///
    /// Clicking one's own visible piece with a strictly larger size selected
    /// stacks over it; any other click on one's own piece is a reclaim.
    /// Everything else is a placement and needs a selection.
    pub fn interpret(&self, at: Pos, selection: Option<Size>) -> Result<Action, GameError> {
        if self.turn.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        let player = self.turn.player();
        match self.board.top_of(at) {
            Some(top) if top.owner == player => match selection {
                Some(size) if size.can_gobble(top.size) => Ok(Action::Cover { size, at }),
                _ => Ok(Action::Reclaim { from: at }),
            },
            _ => selection
                .map(|size| Action::Place { size, to: at })
                .ok_or(GameError::NoSizeSelected),
        }
    }

    /// Check an action against the current state without changing it.
    pub fn validate(&self, action: Action) -> Result<(), GameError> {
        if self.turn.is_ended() {
            return Err(GameError::GameAlreadyEnded);
        }
        let player = self.turn.player();

        match action {
            Action::Place { size, to: cell } | Action::Cover { size, at: cell } => {
                let top = self.board.top_of(cell);
                if matches!(action, Action::Cover { .. }) && top.map(|p| p.owner) != Some(player) {
                    return Err(GameError::NotYourPiece(cell));
                }
                // A self-cover discharges the obligation with any size
                if let (Action::Place { .. }, Some(required)) = (action, self.turn.obligation()) {
                    if required != size {
                        return Err(GameError::ObligationMismatch { required, selected: size });
                    }
                }
                if self.inventory.count(player, size) == 0 {
                    return Err(GameError::InventoryExhausted { player, size });
                }
                if let Some(top) = top {
                    if !size.can_gobble(top.size) {
                        return Err(GameError::IllegalCover { size, top: top.size });
                    }
                }
            }
            Action::Reclaim { from } => {
                let top = self.board.top_of(from).ok_or(GameError::EmptyCell(from))?;
                if top.owner != player {
                    return Err(GameError::NotYourPiece(from));
                }
                if let Some(pending) = self.turn.obligation() {
                    return Err(GameError::ObligationPending(pending));
                }
            }
        }
        Ok(())
    }

    /// Validate and apply an action.
    ///
    /// Placements check for a winner before passing the turn. A reclaim keeps
    /// the turn but is also checked, since uncovering can complete a line.
    pub fn apply(&mut self, action: Action) -> Result<Applied, GameError> {
        self.validate(action)?;
        let player = self.turn.player();
        let obligation = self.turn.obligation();
        let replacing_from = self.turn.replacing_from();
        let mut replaced_from = None;

        let size = match action {
            Action::Place { size, to: cell } | Action::Cover { size, at: cell } => {
                self.inventory.take(player, size)?;
                self.board.push(cell, Piece::new(player, size));
                if obligation == Some(size) {
                    replaced_from = replacing_from;
                }
                match self.board.winner() {
                    Some(winner) => self.turn.end(winner),
                    None => self.turn.pass(),
                }
                size
            }
            Action::Reclaim { from } => {
                let piece = self.board.pop(from)?;
                self.inventory.give(player, piece.size);
                self.turn.oblige(piece.size, from)?;
                if let Some(winner) = self.board.winner() {
                    self.turn.end(winner);
                }
                piece.size
            }
        };

        Ok(Applied {
            action,
            player,
            size,
            replaced_from,
            winner: self.turn.winner(),
        })
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Option<Player> {
        self.turn.winner()
    }
}
