use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A single-use 52-card deck, permuted once when it is built.
///
/// Cards come off the front and are never returned, so one deck can not deal
/// the same card twice.
///
/// # Examples
///
/// ```
/// use homegame_engine::deck::Deck;
///
/// let mut a = Deck::new_with_seed(7);
/// let mut b = Deck::new_with_seed(7);
/// assert_eq!(a.deal_card().unwrap(), b.deal_card().unwrap());
/// assert_eq!(a.remaining(), 51);
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// Unshuffled deck, spades first, Two through Ace within each suit.
    pub fn ordered() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards, position: 0 }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn deal_card(&mut self) -> Result<Card, GameError> {
        let c = *self
            .cards
            .get(self.position)
            .ok_or(GameError::DeckExhausted)?;
        self.position += 1;
        Ok(c)
    }

    /// Deal `n` cards, or none at all when fewer than `n` remain.
    pub fn deal_n(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if self.remaining() < n {
            return Err(GameError::DeckExhausted);
        }
        (0..n).map(|_| self.deal_card()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}
