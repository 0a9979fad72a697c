use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::player::{Player, PlayerId};

/// Betting stage of a hand. `Showdown` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preflop = 0,
    Flop = 1,
    Turn = 2,
    River = 3,
    Showdown = 4,
}

impl Stage {
    pub fn index(self) -> u8 {
        self as u8
    }

    /// How many of the five pre-dealt board cards observers may see.
    pub fn revealed_count(self) -> usize {
        match self {
            Stage::Preflop => 0,
            Stage::Flop => 3,
            Stage::Turn => 4,
            Stage::River | Stage::Showdown => 5,
        }
    }

    pub fn next(self) -> Stage {
        match self {
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River | Stage::Showdown => Stage::Showdown,
        }
    }
}

/// Hand-scoped part of the board, created at deal and dropped at undeal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// All five community cards, dealt up front
    pub board_cards: [Card; 5],
    /// Sum of every player's `betted` while the hand runs
    pub pot: u64,
    /// Amount every active player must have committed to call
    pub bet_per_person: u64,
    /// Smallest raise increment that reopens the action
    pub min_raise: u64,
    pub stage: Stage,
    pub small_blind: usize,
    pub big_blind: usize,
    /// Seat to act; `None` once the hand is over
    pub current: Option<usize>,
    /// Seat the action has to come back to before the street ends
    pub current_leader: Option<usize>,
    pub post_flop_leader: usize,
}

impl RoundState {
    pub fn revealed(&self) -> &[Card] {
        &self.board_cards[..self.stage.revealed_count()]
    }

    pub fn is_over(&self) -> bool {
        self.stage == Stage::Showdown
    }
}

/// Per-game board record. `big_blind` and `dealer` outlive hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub big_blind: u64,
    /// Dealer seat of the last hand dealt
    pub dealer: Option<usize>,
    pub round: Option<RoundState>,
}

impl Board {
    pub fn new(big_blind: u64) -> Self {
        Self {
            big_blind,
            dealer: None,
            round: None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        self.round.as_ref().map(|r| r.stage)
    }

    /// A hand has been dealt and has not reached showdown.
    pub fn hand_in_progress(&self) -> bool {
        self.round.as_ref().is_some_and(|r| !r.is_over())
    }

    pub fn pot(&self) -> u64 {
        self.round.as_ref().map_or(0, |r| r.pot)
    }
}

/// In-memory aggregate of one game: seats in creation order plus the board.
/// Transitions take a `&Table` and hand back a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub players: Vec<Player>,
    pub board: Board,
}

impl Table {
    pub fn new(players: Vec<Player>, board: Board) -> Self {
        Self { players, board }
    }

    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn round(&self) -> Result<&RoundState, GameError> {
        self.board.round.as_ref().ok_or(GameError::NoHandInProgress)
    }

    /// Sum of `betted` across all seats.
    pub fn committed(&self) -> u64 {
        self.players.iter().map(|p| p.betted).sum()
    }

    /// Stacks plus pot; constant for the duration of a hand.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| p.stack).sum::<u64>() + self.board.pot()
    }

    pub fn players_with_cards(&self) -> usize {
        self.players.iter().filter(|p| p.has_cards()).count()
    }

    pub fn players_able_to_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revealed_count_follows_stage() {
        let counts: Vec<usize> = [
            Stage::Preflop,
            Stage::Flop,
            Stage::Turn,
            Stage::River,
            Stage::Showdown,
        ]
        .iter()
        .map(|s| s.revealed_count())
        .collect();
        assert_eq!(counts, vec![0, 3, 4, 5, 5]);
    }

    #[test]
    fn showdown_is_terminal() {
        assert_eq!(Stage::River.next(), Stage::Showdown);
        assert_eq!(Stage::Showdown.next(), Stage::Showdown);
    }

    #[test]
    fn fresh_board_has_no_hand() {
        let b = Board::new(100);
        assert!(!b.hand_in_progress());
        assert_eq!(b.pot(), 0);
        assert_eq!(b.stage(), None);
    }
}
