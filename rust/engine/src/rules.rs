use crate::board::RoundState;
use crate::errors::GameError;
use crate::player::{Player, PlayerAction as A};

/// Chip movement an action resolves to, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    /// Chips moved from the stack; may be short of what is owed when all-in
    Call(u64),
    Raise {
        /// Increment added to the bet per person
        increment: u64,
        /// Chips moved from the stack: what was owed plus the increment
        committed: u64,
        /// At least the current minimum raise, so the action is reopened
        full: bool,
    },
}

/// Chips the player still owes to match the bet per person.
pub fn to_call(round: &RoundState, player: &Player) -> u64 {
    round.bet_per_person.saturating_sub(player.betted)
}

/// Validates a player action against the hand state and the player's stack.
///
/// A call never fails: a player who can not cover the bet goes all-in for
/// what they have. A raise must be positive and the stack must cover the
/// amount owed plus the increment. A raise below the current minimum is only
/// legal when it puts the player all-in, and it does not reopen the action
/// for the other players.
///
/// # Errors
///
/// Returns [`GameError::InvalidAmount`] for a zero raise, one the stack can
/// not cover, or a short raise that leaves chips behind.
///
/// # Examples
///
/// ```
/// use homegame_engine::rules::{validate_raise, ValidatedAction};
///
/// // owes 50, raises by 100, min raise 100
/// let v = validate_raise(1000, 50, 100, 100).unwrap();
/// assert_eq!(v, ValidatedAction::Raise { increment: 100, committed: 150, full: true });
///
/// // short all-in raise is accepted without reopening
/// let v = validate_raise(90, 50, 40, 100).unwrap();
/// assert!(matches!(v, ValidatedAction::Raise { full: false, .. }));
///
/// // a short raise from a deeper stack is not
/// assert!(validate_raise(1000, 50, 40, 100).is_err());
///
/// assert!(validate_raise(120, 50, 100, 100).is_err());
/// ```
pub fn validate_raise(
    stack: u64,
    owed: u64,
    increment: u64,
    min_raise: u64,
) -> Result<ValidatedAction, GameError> {
    if increment == 0 {
        return Err(GameError::invalid_amount(increment, "raise must be positive"));
    }
    let committed = owed
        .checked_add(increment)
        .ok_or_else(|| GameError::invalid_amount(increment, "raise too large"))?;
    if committed > stack {
        return Err(GameError::invalid_amount(increment, "raise exceeds stack"));
    }
    if increment < min_raise && committed < stack {
        return Err(GameError::invalid_amount(increment, "raise below minimum"));
    }
    Ok(ValidatedAction::Raise {
        increment,
        committed,
        full: increment >= min_raise,
    })
}

pub fn validate_action(
    round: &RoundState,
    player: &Player,
    action: A,
) -> Result<ValidatedAction, GameError> {
    let owed = to_call(round, player);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Call => Ok(ValidatedAction::Call(owed.min(player.stack))),
        A::Raise(_) if !player.can_raise => Err(GameError::RaiseNotAllowed),
        A::Raise(increment) => validate_raise(player.stack, owed, increment, round.min_raise),
    }
}

/// Parses a whole, non-negative number of minor units.
///
/// ```
/// use homegame_engine::rules::parse_amount;
///
/// assert_eq!(parse_amount(" 250 ").unwrap(), 250);
/// assert!(parse_amount("-5").is_err());
/// assert!(parse_amount("2.5").is_err());
/// ```
pub fn parse_amount(raw: &str) -> Result<u64, GameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GameError::invalid_amount(raw, "empty"));
    }
    if trimmed.starts_with('-') {
        return Err(GameError::invalid_amount(raw, "negative"));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| GameError::invalid_amount(raw, "not a whole number"))
}
