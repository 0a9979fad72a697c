//! Layered CLI configuration.
//!
//! Defaults are overridden by a TOML file named in `HOMEGAME_CONFIG`, which
//! is in turn overridden by `HOMEGAME_SEED`, `HOMEGAME_BIG_BLIND`,
//! `HOMEGAME_STARTING_STACK` and `HOMEGAME_PLAYERS`. Command-line flags win
//! over all of these inside the individual commands.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use homegame_engine::settings::{EngineSettings, MAX_SEATS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub big_blind: u64,
    pub starting_stack: u64,
    pub players: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub big_blind: ValueSource,
    pub starting_stack: ValueSource,
    pub players: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            big_blind: ValueSource::Default,
            starting_stack: ValueSource::Default,
            players: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            seed: None,
            big_blind: engine.default_big_blind,
            starting_stack: engine.default_big_blind * 100,
            players: 6,
        }
    }
}

impl Config {
    /// Engine settings for a run with `players` seats.
    pub fn engine_settings(
        &self,
        players: usize,
        seed: Option<u64>,
        history_path: Option<PathBuf>,
    ) -> EngineSettings {
        EngineSettings {
            default_big_blind: self.big_blind,
            max_players: players,
            seed,
            history_path,
            ..EngineSettings::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOMEGAME_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("HOMEGAME_SEED", "seed")? {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(bb) = env_value("HOMEGAME_BIG_BLIND", "big_blind")? {
        cfg.big_blind = bb;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(stack) = env_value("HOMEGAME_STARTING_STACK", "starting_stack")? {
        cfg.starting_stack = stack;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(players) = env_value("HOMEGAME_PLAYERS", "players")? {
        cfg.players = players;
        sources.players = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value<T: std::str::FromStr>(var: &str, name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {:?}", name, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    big_blind: Option<u64>,
    #[serde(default)]
    starting_stack: Option<u64>,
    #[serde(default)]
    players: Option<usize>,
}

/// Seat counts the engine accepts.
pub fn validate_players(players: usize) -> Result<(), ConfigError> {
    if !(2..=MAX_SEATS).contains(&players) {
        return Err(ConfigError::Invalid(format!(
            "players must be between 2 and {}",
            MAX_SEATS
        )));
    }
    Ok(())
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.big_blind == 0 {
        return Err(ConfigError::Invalid("big_blind must be >0".into()));
    }
    let max_stack = EngineSettings::default().max_stack;
    if cfg.starting_stack == 0 || cfg.starting_stack > max_stack {
        return Err(ConfigError::Invalid(format!(
            "starting_stack must be between 1 and {}",
            max_stack
        )));
    }
    validate_players(cfg.players)
}
