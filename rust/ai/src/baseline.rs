//! Rule-based bot: preflop strength table, made-hand strength after the
//! flop and pot odds when facing a bet. Deterministic for a given table.

use homegame_engine::board::{Stage, Table};
use homegame_engine::cards::Card;
use homegame_engine::hand::{best_of, Category};
use homegame_engine::player::PlayerAction;
use homegame_engine::rules::to_call;

use crate::SeatStrategy;

// rank ordinals
const ACE: u8 = 12;
const KING: u8 = 11;
const QUEEN: u8 = 10;
const JACK: u8 = 9;
const TEN: u8 = 8;
const NINE: u8 = 7;
const EIGHT: u8 = 6;
const SEVEN: u8 = 5;

/// Simple baseline bot for simulations.
///
/// **Preflop:** premium pairs and big aces raise, medium hands call when it is
/// cheap, weak hands fold to a bet and check otherwise.
///
/// **Postflop:** two pair or better bets and calls, one pair calls small bets,
/// anything weaker folds unless the pot odds are generous.
#[derive(Debug, Clone, Default)]
pub struct BaselineBot;

impl BaselineBot {
    pub fn new() -> Self {
        Self
    }

    /// Preflop hand strength on a 0-10 scale.
    fn preflop_strength(hole: [Card; 2]) -> u8 {
        let r1 = hole[0].rank.ordinal();
        let r2 = hole[1].rank.ordinal();
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = hole[0].suit == hole[1].suit;
        let pick = |s: u8, o: u8| if suited { s } else { o };

        if r1 == r2 {
            return match high {
                ACE | KING => 10,
                QUEEN | JACK => 9,
                TEN => 8,
                NINE => 7,
                EIGHT => 6,
                SEVEN => 5,
                _ => 4,
            };
        }

        match (high, low) {
            (ACE, KING) => pick(10, 8),
            (ACE, QUEEN) => pick(8, 7),
            (ACE, JACK) => pick(7, 6),
            (ACE, TEN) => pick(6, 5),
            (ACE, _) => pick(5, 4),
            (KING, QUEEN) => pick(7, 6),
            (KING, JACK) => pick(6, 5),
            (KING, TEN) => pick(5, 4),
            (QUEEN, JACK) => pick(6, 5),
            (QUEEN, TEN) => pick(5, 4),
            _ if suited && high - low <= 2 => {
                if high >= NINE {
                    5
                } else {
                    4
                }
            }
            _ if high >= JACK && low >= NINE => 4,
            _ => 2,
        }
    }

    /// Made-hand strength on a 0-10 scale; `None` before the flop.
    fn postflop_strength(hole: [Card; 2], board: &[Card]) -> Option<u8> {
        if board.len() < 3 {
            return None;
        }
        let mut cards = hole.to_vec();
        cards.extend_from_slice(board);
        let score = best_of(&cards)?;

        let base = match score.category()? {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
        };
        let high_hole = hole.iter().map(|c| c.rank.ordinal()).max().unwrap_or(0);
        let kicker_boost = u8::from(high_hole >= QUEEN);

        Some((base + kicker_boost).min(10))
    }

    /// Pot / (pot + call); 1.0 when the call is free.
    fn pot_odds(pot: u64, call: u64) -> f64 {
        if call == 0 {
            return 1.0;
        }
        pot as f64 / (pot + call) as f64
    }

    fn decide_facing_bet(strength: u8, owed: u64, min_raise: u64, stack: u64, pot: u64) -> PlayerAction {
        // can't cover: a call puts us all-in
        if owed >= stack {
            return if strength >= 7 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            };
        }

        let odds = Self::pot_odds(pot, owed);
        match strength {
            9..=10 => {
                let room = stack - owed;
                let raise = (pot / 2).max(min_raise).min(room);
                if raise >= min_raise {
                    PlayerAction::Raise(raise)
                } else {
                    PlayerAction::Call
                }
            }
            7..=8 => PlayerAction::Call,
            5..=6 if odds >= 0.3 || owed <= pot / 4 => PlayerAction::Call,
            3..=4 if odds >= 0.4 || owed <= pot / 6 => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }

    fn decide_unopened(strength: u8, min_raise: u64, stack: u64, pot: u64) -> PlayerAction {
        let size = match strength {
            9..=10 => pot * 2 / 3,
            7..=8 => pot / 2,
            _ => return PlayerAction::Call,
        };
        if stack >= min_raise {
            PlayerAction::Raise(size.max(min_raise).min(stack))
        } else {
            PlayerAction::Call
        }
    }
}

impl SeatStrategy for BaselineBot {
    fn decide(&self, table: &Table, seat: usize) -> PlayerAction {
        let (Ok(round), Some(player)) = (table.round(), table.players.get(seat)) else {
            return PlayerAction::Fold;
        };
        let Some(hole) = player.hole else {
            return PlayerAction::Fold;
        };

        let owed = to_call(round, player);
        let strength = if round.stage == Stage::Preflop {
            Self::preflop_strength(hole)
        } else {
            Self::postflop_strength(hole, round.revealed())
                .unwrap_or_else(|| Self::preflop_strength(hole))
        };

        let action = if owed == 0 {
            Self::decide_unopened(strength, round.min_raise, player.stack, round.pot)
        } else {
            Self::decide_facing_bet(strength, owed, round.min_raise, player.stack, round.pot)
        };
        // a short all-in closed the action to this seat
        match action {
            PlayerAction::Raise(_) if !player.can_raise => PlayerAction::Call,
            other => other,
        }
    }

    fn name(&self) -> &str {
        "BaselineBot"
    }
}
