//! Showdown settlement with side pots.
//!
//! Nothing about side pots is stored during the hand. Each player's `betted`
//! is the whole record, and the pots fall out of it at settlement: the best
//! remaining hand takes, from every player, up to what it committed itself,
//! and the next best hand repeats the process with what is left.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::{self, HandScore};
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: usize,
    pub amount: u64,
}

/// Result of settling one pot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Chips won at showdown, one entry per winning seat
    pub awards: Vec<Payout>,
    /// Uncontested chips returned to the seat that committed them
    pub refunds: Vec<Payout>,
}

impl Settlement {
    pub fn winners(&self) -> Vec<usize> {
        self.awards.iter().map(|p| p.seat).collect()
    }

    pub fn total(&self) -> u64 {
        self.awards
            .iter()
            .chain(self.refunds.iter())
            .map(|p| p.amount)
            .sum()
    }
}

/// Score every seat still holding cards against the board.
pub fn score_hands(players: &mut [Player], board_cards: &[Card; 5]) -> Vec<Option<HandScore>> {
    players
        .iter_mut()
        .map(|p| {
            let [a, b] = p.hole?;
            let [c0, c1, c2, c3, c4] = *board_cards;
            let score = hand::best(&[a, b, c0, c1, c2, c3, c4]);
            p.score = Some(score);
            p.score_description = Some(score.describe());
            Some(score)
        })
        .collect()
}

/// Distribute `pot` among the players and zero every `betted`.
///
/// Winners of equal strength are shuffled and then ordered by committed
/// amount and stack, smallest first. Each of them in turn caps a tier at
/// what it still has committed, and the tier is split evenly among it and
/// the tied winners after it. Odd units go one each to the earliest winners
/// of the tier.
///
/// # Errors
///
/// [`GameError::InvariantViolation`] when `pot` differs from the sum of
/// `betted`. Nothing is mutated in that case.
pub fn settle<R: Rng + ?Sized>(
    players: &mut [Player],
    board_cards: &[Card; 5],
    pot: u64,
    rng: &mut R,
) -> Result<Settlement, GameError> {
    let committed: u64 = players.iter().map(|p| p.betted).sum();
    if committed != pot {
        return Err(GameError::InvariantViolation(format!(
            "pot {pot} does not match committed chips {committed}"
        )));
    }

    let stacks: Vec<u64> = players.iter().map(|p| p.stack).collect();
    // None once a seat is out of contention or already paid
    let mut contenders = score_hands(players, board_cards);
    let mut won = vec![0u64; players.len()];
    let mut pot = pot;

    while pot > 0 {
        let Some(top) = contenders.iter().flatten().max().copied() else {
            break;
        };
        let mut winners: Vec<usize> = (0..players.len())
            .filter(|&s| contenders[s] == Some(top))
            .collect();
        for &s in &winners {
            contenders[s] = None;
        }
        winners.shuffle(rng);
        winners.sort_by_key(|&s| (players[s].betted, stacks[s]));

        for i in 0..winners.len() {
            let cap = players[winners[i]].betted;
            let mut tier = 0u64;
            for p in players.iter_mut() {
                let take = p.betted.min(cap);
                p.betted -= take;
                tier += take;
            }
            pot -= tier;

            let sharers = &winners[i..];
            let n = sharers.len() as u64;
            let share = tier / n;
            let mut odd = tier % n;
            for &s in sharers {
                let mut amount = share;
                if odd > 0 {
                    amount += 1;
                    odd -= 1;
                }
                players[s].credit(amount);
                won[s] += amount;
            }
        }
    }

    let mut refunds = Vec::new();
    for (seat, p) in players.iter_mut().enumerate() {
        if p.betted > 0 {
            let amount = std::mem::take(&mut p.betted);
            p.stack += amount;
            refunds.push(Payout { seat, amount });
        }
    }

    let awards = won
        .into_iter()
        .enumerate()
        .filter(|&(_, amount)| amount > 0)
        .map(|(seat, amount)| Payout { seat, amount })
        .collect();

    Ok(Settlement { awards, refunds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::player::PlayerId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn seat(name: &str, hole: &str, stack: u64, betted: u64) -> Player {
        let mut p = Player::new(PlayerId::new(name), name, stack);
        let cards = parse_cards(hole).unwrap();
        p.hole = Some([cards[0], cards[1]]);
        p.betted = betted;
        p
    }

    fn board(s: &str) -> [Card; 5] {
        parse_cards(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn mismatched_pot_is_rejected_untouched() {
        let mut players = vec![seat("a", "As Ah", 0, 50), seat("b", "Ks Kh", 0, 50)];
        let before = players.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = settle(&mut players, &board("2c 7d 9h Js 3s"), 120, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvariantViolation(_)));
        assert_eq!(players, before);
    }

    #[test]
    fn uncalled_excess_from_folded_seat_is_refunded() {
        let mut players = vec![seat("a", "As Ah", 0, 40), seat("b", "Ks Kh", 100, 0)];
        let mut folder = Player::new(PlayerId::new("c"), "c", 0);
        folder.betted = 100;
        players.push(folder);
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let s = settle(&mut players, &board("2c 7d 9h Js 3s"), 140, &mut rng).unwrap();
        assert_eq!(s.awards, vec![Payout { seat: 0, amount: 80 }]);
        assert_eq!(s.refunds, vec![Payout { seat: 2, amount: 60 }]);
        assert!(players.iter().all(|p| p.betted == 0));
    }
}
