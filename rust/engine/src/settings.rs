use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two hole cards per seat plus five board cards must fit in one deck.
pub const MAX_SEATS: usize = 23;

/// Engine-wide settings shared by every game a [`GameService`](crate::service::GameService) runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Big blind for newly created games, in minor units
    pub default_big_blind: u64,
    /// Seats per game
    pub max_players: usize,
    /// Largest stack a player may be given, in minor units
    pub max_stack: u64,
    /// Seed for the shuffling RNG; random when absent
    pub seed: Option<u64>,
    /// JSONL file that completed hands are appended to
    pub history_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_big_blind: 100,
            max_players: 10,
            max_stack: 100_000_000,
            seed: None,
            history_path: None,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_big_blind == 0 {
            return Err(SettingsError::InvalidValue(
                "default_big_blind must be greater than 0".to_string(),
            ));
        }

        if self.max_stack == 0 {
            return Err(SettingsError::InvalidValue(
                "max_stack must be greater than 0".to_string(),
            ));
        }

        if self.default_big_blind > self.max_stack {
            return Err(SettingsError::InvalidValue(
                "default_big_blind cannot exceed max_stack".to_string(),
            ));
        }

        if !(2..=MAX_SEATS).contains(&self.max_players) {
            return Err(SettingsError::InvalidValue(format!(
                "max_players must be between 2 and {MAX_SEATS}"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
    #[error("Failed to open hand history: {0}")]
    History(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineSettings::default().validate().is_ok());
    }

    #[test]
    fn seat_limit_follows_deck_size() {
        let mut s = EngineSettings {
            max_players: 23,
            ..EngineSettings::default()
        };
        assert!(s.validate().is_ok());
        s.max_players = 24;
        assert!(s.validate().is_err());
        s.max_players = 1;
        assert!(s.validate().is_err());
    }

    #[test]
    fn zero_big_blind_rejected() {
        let s = EngineSettings {
            default_big_blind: 0,
            ..EngineSettings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("default_big_blind"));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let s: EngineSettings = serde_json::from_str(r#"{"default_big_blind": 20}"#).unwrap();
        assert_eq!(s.default_big_blind, 20);
        assert_eq!(s.max_players, 10);
    }
}
