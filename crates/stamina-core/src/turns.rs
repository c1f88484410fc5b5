use core::fmt;

/// Cards burned from the discard pile to prevent damage with an empty hand.
pub const DAMAGE_DISCARD_COST: u32 = 2;
/// Minimum discard pile size before a long rest can be declared.
pub const REST_MIN_DISCARD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnsError {
    CannotPreventDamage { hand: u32, discard: u32 },
    CannotRest { discard: u32 },
}

impl fmt::Display for TurnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnsError::CannotPreventDamage { hand, discard } => write!(
                f,
                "cannot prevent damage with {hand} in hand and {discard} in discard"
            ),
            TurnsError::CannotRest { discard } => write!(
                f,
                "a long rest needs at least {REST_MIN_DISCARD} discarded cards, found {discard}"
            ),
        }
    }
}

impl std::error::Error for TurnsError {}

// Turn counts are computed in 64 bits and clamp to u32::MAX on the way out,
// so no combination of u32 inputs can overflow or wrap.
fn clamp_turns(turns: u64) -> u32 {
    turns.min(u64::from(u32::MAX)) as u32
}

fn max_turns_initial_wide(hand: u64) -> u64 {
    let half = hand / 2;
    if hand % 2 == 0 { half * half } else { half * (half + 1) }
}

fn max_turns_wide(hand: u64, discard: u64) -> u64 {
    let pool = hand + discard;
    if pool == 0 {
        return 0;
    }
    hand / 2 + max_turns_initial_wide(pool - 1)
}

/// Maximum turns playable from `hand` cards and an empty discard, resting
/// only once the hand runs out. Each turn plays two cards; each long rest
/// returns the discard to hand minus one card lost for good.
///
/// Counts that would exceed `u32::MAX` saturate there.
pub fn max_turns_initial(hand: u32) -> u32 {
    clamp_turns(max_turns_initial_wide(hand.into()))
}

/// Twin of [`max_turns_initial`] evaluating the defining recurrence
/// (`f(2) = 1`, `f(n) = n/2 + f(n-1)`) bottom-up, kept as a cross-check on
/// the closed form. Unrolled into a loop so deep hands cannot exhaust the
/// stack.
pub fn max_turns_initial_recursive(hand: u32) -> u32 {
    let mut turns = 0u64;
    for n in 2..=u64::from(hand) {
        turns += n / 2;
    }
    clamp_turns(turns)
}

/// Maximum turns playable with `hand` cards in hand and `discard` cards
/// recoverable through a long rest.
pub fn max_turns(hand: u32, discard: u32) -> u32 {
    clamp_turns(max_turns_wide(hand.into(), discard.into()))
}

/// Turns lost to preventing one hit: one card from hand where possible,
/// otherwise two cards from discard.
pub fn turns_lost(hand: u32, discard: u32) -> Result<u32, TurnsError> {
    if hand == 0 {
        if discard < DAMAGE_DISCARD_COST {
            return Err(TurnsError::CannotPreventDamage { hand, discard });
        }
        let before = max_turns_wide(0, discard.into());
        let after = max_turns_wide(0, u64::from(discard - DAMAGE_DISCARD_COST));
        return Ok(clamp_turns(before - after));
    }
    let before = max_turns_wide(hand.into(), discard.into());
    let after = max_turns_wide(u64::from(hand - 1), discard.into());
    Ok(clamp_turns(before - after))
}

/// Turns lost to preventing one hit when the two cards always come from the
/// discard pile, even with cards still in hand.
pub fn turns_lost_from_discard(hand: u32, discard: u32) -> Result<u32, TurnsError> {
    if discard < DAMAGE_DISCARD_COST {
        return Err(TurnsError::CannotPreventDamage { hand, discard });
    }
    let before = max_turns_wide(hand.into(), discard.into());
    let after = max_turns_wide(hand.into(), u64::from(discard - DAMAGE_DISCARD_COST));
    Ok(clamp_turns(before - after))
}

/// Turns lost by long resting right now instead of playing the hand out
/// first.
pub fn turns_lost_early_rest(hand: u32, discard: u32) -> Result<u32, TurnsError> {
    if discard < REST_MIN_DISCARD {
        return Err(TurnsError::CannotRest { discard });
    }
    let pool = u64::from(hand) + u64::from(discard);
    let before = max_turns_wide(hand.into(), discard.into());
    let after = max_turns_wide(pool - 1, 0);
    Ok(clamp_turns(before - after))
}
