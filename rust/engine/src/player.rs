use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::Card;
use crate::hand::HandScore;

/// Opaque player identity, stable for the life of the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn random() -> Self {
        PlayerId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a player action during a betting round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "amount")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Match the current bet (a check when nothing is owed)
    Call,
    /// Raise the bet per person by the given increment
    Raise(u64),
}

/// A seated player: persistent identity and stack plus the fields that only
/// live for the duration of one hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Opaque identity
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Chips behind, in minor currency units
    pub stack: u64,
    /// Hole cards; `None` when folded or not dealt in
    pub hole: Option<[Card; 2]>,
    /// Chips committed to the pot this hand
    pub betted: u64,
    pub can_raise: bool,
    /// Whether the hole cards are revealed to the table
    pub show: bool,
    /// Chips credited at settlement this hand
    pub won: u64,
    /// Best hand, filled at showdown
    pub score: Option<HandScore>,
    pub score_description: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: u64) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            hole: None,
            betted: 0,
            can_raise: false,
            show: false,
            won: 0,
            score: None,
            score_description: None,
        }
    }

    pub fn has_cards(&self) -> bool {
        self.hole.is_some()
    }

    /// Still holding cards and chips behind, so can take an action.
    pub fn can_act(&self) -> bool {
        self.has_cards() && self.stack > 0
    }

    /// Move chips from the stack into `betted`. Caller guarantees
    /// `amount <= stack`.
    pub(crate) fn commit(&mut self, amount: u64) {
        debug_assert!(amount <= self.stack);
        self.stack -= amount;
        self.betted += amount;
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.stack += amount;
        self.won += amount;
    }

    /// Drop every hand-scoped field.
    pub fn clear_hand(&mut self) {
        self.hole = None;
        self.betted = 0;
        self.can_raise = false;
        self.show = false;
        self.won = 0;
        self.score = None;
        self.score_description = None;
    }

    /// Fresh hand-scoped fields at deal time.
    pub(crate) fn reset_for_deal(&mut self) {
        self.clear_hand();
        self.can_raise = true;
    }
}
