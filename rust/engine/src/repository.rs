//! Storage abstraction for games.
//!
//! The engine itself never touches storage. [`GameService`](crate::service::GameService)
//! loads a [`Table`] through a [`GameRepository`], runs a transition on it and
//! writes the result back with [`GameRepository::store_table`].

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Table};
use crate::errors::RepositoryError;
use crate::player::{Player, PlayerId};

/// Short numeric game code, shared with the people joining the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    /// A random six digit code. Uniqueness is the caller's concern.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        GameId(rng.random_range(100_000u32..1_000_000).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CRUD over one game's players and board.
///
/// Implementations must be safe to share across threads. Callers serialize
/// mutations per game, so implementations only have to keep each call
/// atomic on its own.
pub trait GameRepository: Send + Sync {
    fn create_game(&self, game_id: &GameId, board: Board) -> Result<(), RepositoryError>;
    fn delete_game(&self, game_id: &GameId) -> Result<(), RepositoryError>;
    fn contains_game(&self, game_id: &GameId) -> Result<bool, RepositoryError>;

    /// Players in seat order.
    fn list_players(&self, game_id: &GameId) -> Result<Vec<Player>, RepositoryError>;
    fn insert_player(&self, game_id: &GameId, player: Player) -> Result<(), RepositoryError>;
    fn remove_player(&self, game_id: &GameId, player_id: &PlayerId)
        -> Result<Player, RepositoryError>;
    fn update_player(&self, game_id: &GameId, player: &Player) -> Result<(), RepositoryError>;

    fn get_board(&self, game_id: &GameId) -> Result<Board, RepositoryError>;
    fn update_board(&self, game_id: &GameId, board: &Board) -> Result<(), RepositoryError>;

    fn load_table(&self, game_id: &GameId) -> Result<Table, RepositoryError> {
        Ok(Table::new(
            self.list_players(game_id)?,
            self.get_board(game_id)?,
        ))
    }

    /// Persist a whole table. The default writes record by record; override
    /// it when the backend can commit everything at once.
    fn store_table(&self, game_id: &GameId, table: &Table) -> Result<(), RepositoryError> {
        for p in &table.players {
            self.update_player(game_id, p)?;
        }
        self.update_board(game_id, &table.board)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    games: RwLock<HashMap<GameId, Table>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        game_id: &GameId,
        f: impl FnOnce(&Table) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let guard = self
            .games
            .read()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        let table = guard
            .get(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.clone()))?;
        f(table)
    }

    fn write<T>(
        &self,
        game_id: &GameId,
        f: impl FnOnce(&mut Table) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self
            .games
            .write()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        let table = guard
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.clone()))?;
        f(table)
    }
}

impl GameRepository for InMemoryRepository {
    fn create_game(&self, game_id: &GameId, board: Board) -> Result<(), RepositoryError> {
        let mut guard = self
            .games
            .write()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        if guard.contains_key(game_id) {
            return Err(RepositoryError::DuplicateGame(game_id.clone()));
        }
        guard.insert(game_id.clone(), Table::new(Vec::new(), board));
        Ok(())
    }

    fn delete_game(&self, game_id: &GameId) -> Result<(), RepositoryError> {
        let mut guard = self
            .games
            .write()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        guard
            .remove(game_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.clone()))
    }

    fn contains_game(&self, game_id: &GameId) -> Result<bool, RepositoryError> {
        let guard = self
            .games
            .read()
            .map_err(|_| RepositoryError::StoragePoisoned)?;
        Ok(guard.contains_key(game_id))
    }

    fn list_players(&self, game_id: &GameId) -> Result<Vec<Player>, RepositoryError> {
        self.read(game_id, |t| Ok(t.players.clone()))
    }

    fn insert_player(&self, game_id: &GameId, player: Player) -> Result<(), RepositoryError> {
        self.write(game_id, |t| {
            t.players.push(player);
            Ok(())
        })
    }

    fn remove_player(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<Player, RepositoryError> {
        self.write(game_id, |t| {
            let seat = t
                .seat_of(player_id)
                .ok_or_else(|| RepositoryError::PlayerNotFound(player_id.clone()))?;
            Ok(t.players.remove(seat))
        })
    }

    fn update_player(&self, game_id: &GameId, player: &Player) -> Result<(), RepositoryError> {
        self.write(game_id, |t| {
            let seat = t
                .seat_of(&player.id)
                .ok_or_else(|| RepositoryError::PlayerNotFound(player.id.clone()))?;
            t.players[seat] = player.clone();
            Ok(())
        })
    }

    fn get_board(&self, game_id: &GameId) -> Result<Board, RepositoryError> {
        self.read(game_id, |t| Ok(t.board.clone()))
    }

    fn update_board(&self, game_id: &GameId, board: &Board) -> Result<(), RepositoryError> {
        self.write(game_id, |t| {
            t.board = board.clone();
            Ok(())
        })
    }

    fn load_table(&self, game_id: &GameId) -> Result<Table, RepositoryError> {
        self.read(game_id, |t| Ok(t.clone()))
    }

    fn store_table(&self, game_id: &GameId, table: &Table) -> Result<(), RepositoryError> {
        self.write(game_id, |t| {
            if let Some(p) = table.players.iter().find(|p| t.seat_of(&p.id).is_none()) {
                return Err(RepositoryError::PlayerNotFound(p.id.clone()));
            }
            *t = table.clone();
            Ok(())
        })
    }
}
