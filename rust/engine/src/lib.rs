//! # homegame-engine: Multi-player Poker Table Engine
//!
//! Tracks chip stacks, hole and community cards, betting rounds and pot
//! settlement (side pots included) for a home poker game with any number of
//! seats from two up. Shuffles and tie-break ordering go through an injected
//! RNG, so seeded runs are reproducible.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text notation
//! - [`deck`] - Single-use shuffled deck
//! - [`hand`] - Five/seven card evaluation into a packed, comparable score
//! - [`player`] - Player record and actions
//! - [`board`] - Board record, hand-scoped round state and the [`board::Table`] aggregate
//! - [`rules`] - Action validation and amount parsing
//! - [`round`] - Deal, apply an action, advance the turn
//! - [`pot`] - Showdown settlement with side pots
//! - [`repository`] - Storage trait and the in-memory implementation
//! - [`service`] - Per-game serialized operations over a repository
//! - [`logger`] - Hand history records written as JSONL
//! - [`settings`] - Engine settings and validation
//! - [`logging`] - `tracing` setup and a capturing subscriber for tests
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use homegame_engine::cards::parse_cards;
//! use homegame_engine::hand::best_of;
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let score = best_of(&cards).unwrap();
//! assert_eq!(score.describe(), "Royal Flush");
//! ```
//!
//! ## Running a Game
//!
//! ```rust
//! use homegame_engine::repository::InMemoryRepository;
//! use homegame_engine::service::GameService;
//! use homegame_engine::settings::EngineSettings;
//!
//! let settings = EngineSettings { seed: Some(42), ..EngineSettings::default() };
//! let svc = GameService::new(InMemoryRepository::new(), settings).unwrap();
//! let game = svc.create_game().unwrap();
//! svc.add_player(&game, "Ann", 10_000).unwrap();
//! svc.add_player(&game, "Bo", 10_000).unwrap();
//!
//! let t = svc.deal(&game).unwrap();
//! assert_eq!(t.table.total_chips(), 20_000);
//! ```

pub mod board;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod logging;
pub mod player;
pub mod pot;
pub mod repository;
pub mod round;
pub mod rules;
pub mod service;
pub mod settings;
