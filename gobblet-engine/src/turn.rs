//! Whose move it is, and what that move is allowed to be.

use crate::{GameError, Player, Pos, Size};

/// Turn state machine.
///
/// ```text
/// Idle(p) --place/cover--> Idle(p')
/// Idle(p) --reclaim------> MustReplace(p, size)
/// MustReplace(p, size) --place size--> Idle(p')
/// MustReplace(p, size) --self-cover---> Idle(p')
/// any --line completed--> Ended
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Turn {
    /// `0` may act freely.
    Idle(Player),
    /// `player` lifted a `size` piece off `from` and has to put one of that
    /// size down before the turn can pass.
    MustReplace { player: Player, size: Size, from: Pos },
    /// `winner` completed a line on `player`'s action.
    Ended { winner: Player, player: Player },
}

impl Turn {
    /// Player 1 opens.
    pub fn new() -> Turn {
        Turn::Idle(Player::One)
    }

    /// The player on move (or, once ended, the one who made the last action).
    pub fn player(&self) -> Player {
        match *self {
            Turn::Idle(player) => player,
            Turn::MustReplace { player, .. } => player,
            Turn::Ended { player, .. } => player,
        }
    }

    /// Size the current player is obliged to place, if any.
    pub fn obligation(&self) -> Option<Size> {
        match *self {
            Turn::MustReplace { size, .. } => Some(size),
            _ => None,
        }
    }

    /// Cell a pending replacement was lifted from.
    pub fn replacing_from(&self) -> Option<Pos> {
        match *self {
            Turn::MustReplace { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Turn::Ended { .. })
    }

    pub fn winner(&self) -> Option<Player> {
        match *self {
            Turn::Ended { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// Hand the move to the opponent, discharging any obligation.
    pub fn pass(&mut self) {
        debug_assert!(!self.is_ended());
        *self = Turn::Idle(self.player().opponent());
    }

    /// Record a reclaim. The turn stays with the same player.
    pub fn oblige(&mut self, size: Size, from: Pos) -> Result<(), GameError> {
        match *self {
            Turn::Idle(player) => {
                *self = Turn::MustReplace { player, size, from };
                Ok(())
            }
            Turn::MustReplace { size: pending, .. } => Err(GameError::ObligationPending(pending)),
            Turn::Ended { .. } => Err(GameError::GameAlreadyEnded),
        }
    }

    /// Close the game in favour of `winner`.
    pub fn end(&mut self, winner: Player) {
        *self = Turn::Ended { winner, player: self.player() };
    }

    /// Status line for the presentation layer.
    pub fn label(&self) -> String {
        match *self {
            Turn::Idle(player) => format!("{}'s turn", player),
            Turn::MustReplace { player, size, .. } => {
                format!("{} must place the reclaimed {}", player, size)
            }
            Turn::Ended { winner, .. } => format!("Player {} wins! ({})", winner as u8, winner),
        }
    }
}

impl Default for Turn {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_alternates() {
        let mut turn = Turn::new();
        assert_eq!(turn.player(), Player::One);
        turn.pass();
        assert_eq!(turn, Turn::Idle(Player::Two));
        turn.pass();
        assert_eq!(turn, Turn::Idle(Player::One));
    }

    #[test]
    fn test_oblige_keeps_player() {
        let mut turn = Turn::new();
        turn.oblige(Size::Large, Pos(4)).unwrap();
        assert_eq!(turn.player(), Player::One);
        assert_eq!(turn.obligation(), Some(Size::Large));
        assert_eq!(turn.replacing_from(), Some(Pos(4)));

        turn.pass();
        assert_eq!(turn, Turn::Idle(Player::Two));
        assert_eq!(turn.obligation(), None);
    }

    #[test]
    fn test_second_reclaim_does_not_overwrite() {
        let mut turn = Turn::new();
        turn.oblige(Size::Medium, Pos(0)).unwrap();
        assert_eq!(
            turn.oblige(Size::Large, Pos(1)),
            Err(GameError::ObligationPending(Size::Medium))
        );
        assert_eq!(turn.obligation(), Some(Size::Medium));
        assert_eq!(turn.replacing_from(), Some(Pos(0)));
    }

    #[test]
    fn test_end_records_winner_and_mover() {
        let mut turn = Turn::Idle(Player::Two);
        turn.end(Player::One);
        assert!(turn.is_ended());
        assert_eq!(turn.winner(), Some(Player::One));
        assert_eq!(turn.player(), Player::Two);
        assert_eq!(turn.oblige(Size::Small, Pos(0)), Err(GameError::GameAlreadyEnded));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Turn::new().label(), "Red's turn");
        let replace = Turn::MustReplace { player: Player::Two, size: Size::Small, from: Pos(3) };
        assert_eq!(replace.label(), "Blue must place the reclaimed Small");
        let ended = Turn::Ended { winner: Player::Two, player: Player::One };
        assert_eq!(ended.label(), "Player 2 wins! (Blue)");
    }
}
