use thiserror::Error;

use crate::player::PlayerId;
use crate::repository::GameId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),
    #[error("Invalid amount: {amount} ({reason})")]
    InvalidAmount { amount: String, reason: &'static str },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("A hand is in progress")]
    HandInProgress,
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("Raising is not allowed: the action was not reopened")]
    RaiseNotAllowed,
    #[error("At least two players with chips are needed, found {0}")]
    NotEnoughPlayers(usize),
    #[error("Table is full ({0} seats)")]
    TableFull(usize),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coarse classification used by callers to map errors onto their own
/// surface (e.g. HTTP status codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PlayerNotFound,
    InvalidAmount,
    IllegalAction,
    DeckExhausted,
    Internal,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::PlayerNotFound(_) => ErrorKind::PlayerNotFound,
            GameError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            GameError::NoHandInProgress
            | GameError::HandAlreadyComplete
            | GameError::HandInProgress
            | GameError::NotPlayersTurn { .. }
            | GameError::RaiseNotAllowed
            | GameError::NotEnoughPlayers(_)
            | GameError::TableFull(_) => ErrorKind::IllegalAction,
            GameError::DeckExhausted => ErrorKind::DeckExhausted,
            GameError::InvariantViolation(_) => ErrorKind::Internal,
            GameError::Repository(RepositoryError::GameNotFound(_))
            | GameError::Repository(RepositoryError::PlayerNotFound(_)) => {
                ErrorKind::PlayerNotFound
            }
            GameError::Repository(_) => ErrorKind::Internal,
        }
    }

    /// True when the request itself was wrong and nothing was mutated.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PlayerNotFound | ErrorKind::InvalidAmount | ErrorKind::IllegalAction
        )
    }

    pub(crate) fn invalid_amount(amount: impl ToString, reason: &'static str) -> Self {
        GameError::InvalidAmount {
            amount: amount.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Game not found: {0}")]
    GameNotFound(GameId),
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),
    #[error("Game already exists: {0}")]
    DuplicateGame(GameId),
    #[error("Repository storage poisoned")]
    StoragePoisoned,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Card must be two characters, got {0:?}")]
    Length(String),
    #[error("Unknown rank {0:?}")]
    Rank(char),
    #[error("Unknown suit {0:?}")]
    Suit(char),
}
