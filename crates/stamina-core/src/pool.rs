use serde::{Deserialize, Serialize};

use crate::turns::{self, DAMAGE_DISCARD_COST, REST_MIN_DISCARD, TurnsError};

/// Cards a player still has access to: the hand plus the recoverable
/// discard pile. Lost cards are out of the count entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardPool {
    pub hand: u32,
    pub discard: u32,
}

impl CardPool {
    pub const fn new(hand: u32, discard: u32) -> Self {
        Self { hand, discard }
    }

    pub const fn total(self) -> u32 {
        self.hand + self.discard
    }

    pub const fn is_exhausted(self) -> bool {
        self.total() == 0
    }

    pub const fn can_prevent_damage(self) -> bool {
        self.hand >= 1 || self.discard >= DAMAGE_DISCARD_COST
    }

    pub const fn can_rest(self) -> bool {
        self.discard >= REST_MIN_DISCARD
    }

    pub fn max_turns(self) -> u32 {
        turns::max_turns(self.hand, self.discard)
    }

    pub fn turns_lost(self) -> Result<u32, TurnsError> {
        turns::turns_lost(self.hand, self.discard)
    }

    pub fn turns_lost_from_discard(self) -> Result<u32, TurnsError> {
        turns::turns_lost_from_discard(self.hand, self.discard)
    }

    pub fn turns_lost_early_rest(self) -> Result<u32, TurnsError> {
        turns::turns_lost_early_rest(self.hand, self.discard)
    }
}

#[cfg(test)]
mod tests {
    use super::CardPool;
    use crate::turns;

    #[test]
    fn methods_match_the_free_functions() {
        let pool = CardPool::new(4, 3);
        assert_eq!(pool.max_turns(), turns::max_turns(4, 3));
        assert_eq!(pool.turns_lost(), turns::turns_lost(4, 3));
        assert_eq!(
            pool.turns_lost_from_discard(),
            turns::turns_lost_from_discard(4, 3)
        );
        assert_eq!(
            pool.turns_lost_early_rest(),
            turns::turns_lost_early_rest(4, 3)
        );
    }

    #[test]
    fn damage_prevention_needs_a_hand_card_or_two_discards() {
        assert!(!CardPool::new(0, 0).can_prevent_damage());
        assert!(!CardPool::new(0, 1).can_prevent_damage());
        assert!(CardPool::new(0, 2).can_prevent_damage());
        assert!(CardPool::new(1, 0).can_prevent_damage());
    }

    #[test]
    fn resting_needs_two_discards() {
        assert!(!CardPool::new(5, 1).can_rest());
        assert!(CardPool::new(0, 2).can_rest());
    }

    #[test]
    fn totals_and_exhaustion() {
        assert_eq!(CardPool::new(4, 3).total(), 7);
        assert!(CardPool::new(0, 0).is_exhausted());
        assert!(!CardPool::new(0, 1).is_exhausted());
    }
}
