//! Pieces each player still holds in hand.
//!
//! Pure bookkeeping: pieces move between a player's hand and the board and are
//! never created or destroyed, so `hand + on_board == PIECES_PER_SIZE` for every
//! player and size.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{GameError, Player, Size};

/// Each player starts with this many pieces of every size.
pub const PIECES_PER_SIZE: u8 = 2;

/// Remaining counts, indexed `[player][size]`.
///
/// Serializes keyed by player and size: `{"One": {"small": 2, ...}, "Two": ...}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Inventory([[u8; 3]; 2]);

#[derive(serde::Serialize)]
struct Hand {
    small: u8,
    medium: u8,
    large: u8,
}

impl From<[u8; 3]> for Hand {
    fn from([small, medium, large]: [u8; 3]) -> Hand {
        Hand { small, medium, large }
    }
}

impl Inventory {
    /// Full hands for both players.
    pub fn new() -> Inventory {
        Inventory([[PIECES_PER_SIZE; 3]; 2])
    }

    /// Pieces of `size` still in `player`'s hand.
    #[inline]
    pub fn count(&self, player: Player, size: Size) -> u8 {
        self.0[player.index()][size as usize]
    }

    /// Counts for one player as [small, medium, large].
    #[inline]
    pub fn hand(&self, player: Player) -> [u8; 3] {
        self.0[player.index()]
    }

    /// Take a piece out of the hand to play it.
    pub fn take(&mut self, player: Player, size: Size) -> Result<(), GameError> {
        let slot = &mut self.0[player.index()][size as usize];
        if *slot == 0 {
            return Err(GameError::InventoryExhausted { player, size });
        }
        *slot -= 1;
        Ok(())
    }

    /// Return a reclaimed piece to the hand.
    ///
    /// # Panics
    ///
    /// If the hand is already full. Only a piece that came off the board can
    /// be given back, so a full hand means the board and inventory disagree.
    pub fn give(&mut self, player: Player, size: Size) {
        let slot = &mut self.0[player.index()][size as usize];
        assert!(
            *slot < PIECES_PER_SIZE,
            "{} already holds every {} piece",
            player,
            size
        );
        *slot += 1;
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut hands = serializer.serialize_struct("Inventory", 2)?;
        hands.serialize_field("One", &Hand::from(self.hand(Player::One)))?;
        hands.serialize_field("Two", &Hand::from(self.hand(Player::Two)))?;
        hands.end()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_hands() {
        let inv = Inventory::new();
        assert_eq!(inv.hand(Player::One), [2, 2, 2]);
        assert_eq!(inv.hand(Player::Two), [2, 2, 2]);
    }

    #[test]
    fn test_take_until_exhausted() {
        let mut inv = Inventory::new();
        assert_eq!(inv.take(Player::One, Size::Medium), Ok(()));
        assert_eq!(inv.take(Player::One, Size::Medium), Ok(()));
        assert_eq!(
            inv.take(Player::One, Size::Medium),
            Err(GameError::InventoryExhausted { player: Player::One, size: Size::Medium })
        );
        assert_eq!(inv.hand(Player::One), [2, 0, 2]);
        // The other player is untouched
        assert_eq!(inv.hand(Player::Two), [2, 2, 2]);
    }

    #[test]
    fn test_give_back() {
        let mut inv = Inventory::new();
        inv.take(Player::Two, Size::Large).unwrap();
        inv.give(Player::Two, Size::Large);
        assert_eq!(inv.count(Player::Two, Size::Large), 2);
    }

    #[test]
    fn test_serializes_keyed_by_player_and_size() {
        let mut inv = Inventory::new();
        inv.take(Player::Two, Size::Small).unwrap();
        let json = serde_json::to_value(inv).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "One": { "small": 2, "medium": 2, "large": 2 },
                "Two": { "small": 1, "medium": 2, "large": 2 }
            })
        );
    }

    #[test]
    #[should_panic(expected = "already holds every")]
    fn test_give_overflow_panics() {
        let mut inv = Inventory::new();
        inv.give(Player::One, Size::Small);
    }
}
