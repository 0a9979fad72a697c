//! Per-game operations on top of a [`GameRepository`].
//!
//! Every mutation of a game runs under that game's lock: load the table,
//! compute the transition, store the result. Different games do not
//! contend with each other apart from the shared RNG.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::board::{Board, Stage, Table};
use crate::errors::{GameError, RepositoryError};
use crate::logger::{ActionRecord, HandLogger, HandRecord, SeatRecord, ShowdownInfo, ShownHand};
use crate::player::{Player, PlayerAction, PlayerId};
use crate::repository::{GameId, GameRepository};
use crate::round::{self, HandEvent, Outcome, Transition};
use crate::settings::{EngineSettings, SettingsError};

const GAME_ID_ATTEMPTS: usize = 64;

pub struct GameService<R: GameRepository> {
    repo: R,
    settings: EngineSettings,
    rng: Mutex<ChaCha20Rng>,
    locks: RwLock<HashMap<GameId, Arc<Mutex<()>>>>,
    /// Record of the hand in flight, or the last finished one, per game
    hands: Mutex<HashMap<GameId, HandRecord>>,
    history: Mutex<HandLogger>,
}

impl<R: GameRepository> GameService<R> {
    pub fn new(repo: R, settings: EngineSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let rng = ChaCha20Rng::seed_from_u64(settings.seed.unwrap_or_else(rand::random));
        let history = match &settings.history_path {
            Some(path) => HandLogger::append(path)?,
            None => HandLogger::detached(),
        };
        Ok(Self {
            repo,
            settings,
            rng: Mutex::new(rng),
            locks: RwLock::new(HashMap::new()),
            hands: Mutex::new(HashMap::new()),
            history: Mutex::new(history),
        })
    }

    /// Replace the hand history sink, e.g. with a logger that has a fixed date.
    pub fn with_hand_logger(mut self, logger: HandLogger) -> Self {
        self.history = Mutex::new(logger);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn game_lock(&self, game_id: &GameId) -> Result<Arc<Mutex<()>>, GameError> {
        {
            let guard = self
                .locks
                .read()
                .map_err(|_| RepositoryError::StoragePoisoned)?;
            if let Some(lock) = guard.get(game_id) {
                return Ok(Arc::clone(lock));
            }
        }
        if !self.repo.contains_game(game_id)? {
            return Err(RepositoryError::GameNotFound(game_id.clone()).into());
        }
        let mut guard = self
            .locks
            .write()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        Ok(Arc::clone(guard.entry(game_id.clone()).or_default()))
    }

    fn with_lock<T>(
        &self,
        game_id: &GameId,
        f: impl FnOnce() -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let lock = self.game_lock(game_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    // ---- games ----

    pub fn create_game(&self) -> Result<GameId, GameError> {
        for _ in 0..GAME_ID_ATTEMPTS {
            let id = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                GameId::random(&mut *rng)
            };
            match self
                .repo
                .create_game(&id, Board::new(self.settings.default_big_blind))
            {
                Ok(()) => {
                    info!(game_id = %id, big_blind = self.settings.default_big_blind, "game created");
                    return Ok(id);
                }
                Err(RepositoryError::DuplicateGame(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(GameError::InvariantViolation(
            "could not allocate a unique game id".into(),
        ))
    }

    pub fn delete_game(&self, game_id: &GameId) -> Result<(), GameError> {
        self.with_lock(game_id, || {
            self.repo.delete_game(game_id)?;
            self.hands
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(game_id);
            Ok(())
        })?;
        if let Ok(mut locks) = self.locks.write() {
            locks.remove(game_id);
        }
        info!(game_id = %game_id, "game deleted");
        Ok(())
    }

    // ---- roster ----

    pub fn add_player(
        &self,
        game_id: &GameId,
        name: impl Into<String>,
        stack: u64,
    ) -> Result<PlayerId, GameError> {
        self.check_stack(stack)?;
        let name = name.into();
        self.with_lock(game_id, || {
            let seated = self.repo.list_players(game_id)?.len();
            if seated >= self.settings.max_players {
                return Err(GameError::TableFull(self.settings.max_players));
            }
            let player = Player::new(PlayerId::random(), name, stack);
            let id = player.id.clone();
            self.repo.insert_player(game_id, player)?;
            info!(game_id = %game_id, player_id = %id, seat = seated, stack, "player added");
            Ok(id)
        })
    }

    /// Rename a player and set their stack. Only between hands.
    pub fn update_player(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
        name: impl Into<String>,
        stack: u64,
    ) -> Result<Player, GameError> {
        self.check_stack(stack)?;
        let name = name.into();
        self.with_lock(game_id, || {
            let table = self.repo.load_table(game_id)?;
            if table.board.hand_in_progress() {
                return Err(GameError::HandInProgress);
            }
            let seat = Self::seat(&table, player_id)?;
            let mut player = table.players[seat].clone();
            player.name = name;
            player.stack = stack;
            self.repo.update_player(game_id, &player)?;
            debug!(game_id = %game_id, player_id = %player_id, stack, "player updated");
            Ok(player)
        })
    }

    /// Remove a player between hands. A seat at or before the dealer moves
    /// the dealer back one seat so the button does not skip anyone.
    pub fn remove_player(&self, game_id: &GameId, player_id: &PlayerId) -> Result<Player, GameError> {
        self.with_lock(game_id, || {
            let table = self.repo.load_table(game_id)?;
            if table.board.hand_in_progress() {
                return Err(GameError::HandInProgress);
            }
            let seat = Self::seat(&table, player_id)?;
            let original = table.board;
            let shifted = match original.dealer {
                Some(dealer) if dealer >= seat => Some(Board {
                    dealer: dealer.checked_sub(1),
                    ..original.clone()
                }),
                _ => None,
            };
            // board first, seat last; a failed removal puts the button back
            if let Some(board) = &shifted {
                self.repo.update_board(game_id, board)?;
            }
            let removed = match self.repo.remove_player(game_id, player_id) {
                Ok(removed) => removed,
                Err(e) => {
                    if shifted.is_some() {
                        self.repo.update_board(game_id, &original)?;
                    }
                    return Err(e.into());
                }
            };
            info!(game_id = %game_id, player_id = %player_id, seat, "player removed");
            Ok(removed)
        })
    }

    /// Flip whether a player's hole cards are shown. Returns the new flag.
    pub fn toggle_show(&self, game_id: &GameId, player_id: &PlayerId) -> Result<bool, GameError> {
        self.with_lock(game_id, || {
            let table = self.repo.load_table(game_id)?;
            let seat = Self::seat(&table, player_id)?;
            let mut player = table.players[seat].clone();
            player.show = !player.show;
            self.repo.update_player(game_id, &player)?;
            Ok(player.show)
        })
    }

    // ---- board ----

    pub fn set_big_blind(&self, game_id: &GameId, amount: u64) -> Result<(), GameError> {
        if amount == 0 {
            return Err(GameError::invalid_amount(amount, "big blind must be positive"));
        }
        if amount > self.settings.max_stack {
            return Err(GameError::invalid_amount(amount, "big blind exceeds maximum stack"));
        }
        self.with_lock(game_id, || {
            let mut board = self.repo.get_board(game_id)?;
            board.big_blind = amount;
            self.repo.update_board(game_id, &board)?;
            debug!(game_id = %game_id, amount, "big blind set");
            Ok(())
        })
    }

    pub fn big_blind(&self, game_id: &GameId) -> Result<u64, GameError> {
        Ok(self.repo.get_board(game_id)?.big_blind)
    }

    pub fn board(&self, game_id: &GameId) -> Result<Board, GameError> {
        Ok(self.repo.get_board(game_id)?)
    }

    pub fn players(&self, game_id: &GameId) -> Result<Vec<Player>, GameError> {
        Ok(self.repo.list_players(game_id)?)
    }

    pub fn table(&self, game_id: &GameId) -> Result<Table, GameError> {
        Ok(self.repo.load_table(game_id)?)
    }

    /// Record of the hand in flight, or of the last one finished.
    pub fn last_hand(&self, game_id: &GameId) -> Option<HandRecord> {
        self.hands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(game_id)
            .cloned()
    }

    // ---- hand ----

    pub fn deal(&self, game_id: &GameId) -> Result<Transition, GameError> {
        self.transition(game_id, None)
    }

    pub fn raise(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
        amount: u64,
    ) -> Result<Transition, GameError> {
        self.transition(game_id, Some((player_id, PlayerAction::Raise(amount))))
    }

    pub fn call(&self, game_id: &GameId, player_id: &PlayerId) -> Result<Transition, GameError> {
        self.transition(game_id, Some((player_id, PlayerAction::Call)))
    }

    pub fn fold(&self, game_id: &GameId, player_id: &PlayerId) -> Result<Transition, GameError> {
        self.transition(game_id, Some((player_id, PlayerAction::Fold)))
    }

    pub fn act(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
        action: PlayerAction,
    ) -> Result<Transition, GameError> {
        self.transition(game_id, Some((player_id, action)))
    }

    /// Abort the current hand, returning committed chips to their owners.
    pub fn undeal(&self, game_id: &GameId) -> Result<(), GameError> {
        self.with_lock(game_id, || {
            let table = self.repo.load_table(game_id)?;
            let aborted = table.board.hand_in_progress();
            self.repo.store_table(game_id, &round::undeal(&table))?;
            let mut hands = self.hands.lock().unwrap_or_else(PoisonError::into_inner);
            if aborted {
                hands.remove(game_id);
            }
            info!(game_id = %game_id, aborted, "hand cleared");
            Ok(())
        })
    }

    fn seat(table: &Table, player_id: &PlayerId) -> Result<usize, GameError> {
        table
            .seat_of(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.clone()))
    }

    fn check_stack(&self, stack: u64) -> Result<(), GameError> {
        if stack > self.settings.max_stack {
            return Err(GameError::invalid_amount(stack, "stack exceeds maximum"));
        }
        Ok(())
    }

    fn transition(
        &self,
        game_id: &GameId,
        action: Option<(&PlayerId, PlayerAction)>,
    ) -> Result<Transition, GameError> {
        self.with_lock(game_id, || {
            let table = self.repo.load_table(game_id)?;
            let acted = match action {
                Some((player_id, action)) => Some((Self::seat(&table, player_id)?, action)),
                None => None,
            };
            let result = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                match acted {
                    Some((seat, action)) => round::apply(&table, seat, action, &mut *rng),
                    None => round::deal(&table, &mut *rng),
                }
            };
            let transition = match result {
                Ok(t) => t,
                Err(err) => {
                    warn!(game_id = %game_id, error = %err, "action rejected");
                    return Err(err);
                }
            };
            self.repo.store_table(game_id, &transition.table)?;
            self.log_events(game_id, &transition);
            self.record(game_id, &table, acted, &transition);
            Ok(transition)
        })
    }

    fn log_events(&self, game_id: &GameId, t: &Transition) {
        for event in &t.events {
            match event {
                HandEvent::HandStarted {
                    dealer,
                    small_blind,
                    big_blind,
                } => info!(game_id = %game_id, dealer, small_blind, big_blind, "hand started"),
                HandEvent::BlindPosted { seat, amount } => {
                    debug!(game_id = %game_id, seat, amount, "blind posted")
                }
                HandEvent::Raised {
                    seat,
                    increment,
                    committed,
                    reopened,
                } => debug!(game_id = %game_id, seat, increment, committed, reopened, "raise"),
                HandEvent::Called { seat, amount } => {
                    debug!(game_id = %game_id, seat, amount, "call")
                }
                HandEvent::Folded { seat } => debug!(game_id = %game_id, seat, "fold"),
                HandEvent::StreetAdvanced { stage } => {
                    debug!(game_id = %game_id, stage = ?stage, "street advanced")
                }
                HandEvent::Showdown => debug!(game_id = %game_id, "showdown"),
                HandEvent::Awarded(p) => {
                    info!(game_id = %game_id, seat = p.seat, amount = p.amount, "pot awarded")
                }
                HandEvent::Refunded(p) => {
                    info!(game_id = %game_id, seat = p.seat, amount = p.amount, "uncalled chips returned")
                }
            }
        }
    }

    fn record(
        &self,
        game_id: &GameId,
        before: &Table,
        acted: Option<(usize, PlayerAction)>,
        t: &Transition,
    ) {
        let mut hands = self.hands.lock().unwrap_or_else(PoisonError::into_inner);
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        match acted {
            None => {
                let seats = before
                    .players
                    .iter()
                    .enumerate()
                    .map(|(seat, p)| SeatRecord {
                        seat,
                        player_id: p.id.clone(),
                        name: p.name.clone(),
                        starting_stack: p.stack,
                    })
                    .collect();
                let record = HandRecord {
                    hand_id: history.next_id(),
                    game_id: game_id.clone(),
                    seed: self.settings.seed,
                    big_blind: t.table.board.big_blind,
                    dealer: t.table.board.dealer.unwrap_or_default(),
                    seats,
                    actions: Vec::new(),
                    board: Vec::new(),
                    payouts: Vec::new(),
                    refunds: Vec::new(),
                    ts: None,
                    showdown: None,
                };
                hands.insert(game_id.clone(), record);
            }
            Some((seat, action)) => {
                if let Some(record) = hands.get_mut(game_id) {
                    record.actions.push(ActionRecord {
                        seat,
                        stage: before.board.stage().unwrap_or(Stage::Preflop),
                        action,
                    });
                }
            }
        }

        if t.outcome != Outcome::HandOver {
            return;
        }
        let Some(record) = hands.get_mut(game_id) else {
            return;
        };
        if let Some(round) = &t.table.board.round {
            record.board = round.board_cards.to_vec();
        }
        for event in &t.events {
            match event {
                HandEvent::Awarded(p) => record.payouts.push(*p),
                HandEvent::Refunded(p) => record.refunds.push(*p),
                _ => {}
            }
        }
        let hands_shown = t
            .table
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.show)
            .filter_map(|(seat, p)| {
                Some(ShownHand {
                    seat,
                    cards: p.hole?,
                    description: p.score_description.clone()?,
                })
            })
            .collect();
        record.showdown = Some(ShowdownInfo {
            winners: record.payouts.iter().map(|p| p.seat).collect(),
            hands: hands_shown,
        });
        if let Err(err) = history.write(record) {
            warn!(game_id = %game_id, hand_id = %record.hand_id, error = %err, "failed to write hand history");
        }
    }
}
