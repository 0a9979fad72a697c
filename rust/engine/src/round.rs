//! Hand lifecycle: dealing, applying actions and moving the turn.
//!
//! Every transition takes the current [`Table`] by reference and returns a
//! new one. A failed transition leaves the caller's table untouched, so the
//! caller persists either the whole result or nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{RoundState, Stage, Table};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::{Player, PlayerAction};
use crate::pot::{self, Payout};
use crate::rules::{validate_action, ValidatedAction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum HandEvent {
    HandStarted {
        dealer: usize,
        small_blind: usize,
        big_blind: usize,
    },
    BlindPosted {
        seat: usize,
        amount: u64,
    },
    Raised {
        seat: usize,
        increment: u64,
        committed: u64,
        reopened: bool,
    },
    Called {
        seat: usize,
        amount: u64,
    },
    Folded {
        seat: usize,
    },
    StreetAdvanced {
        stage: Stage,
    },
    Showdown,
    Awarded(Payout),
    Refunded(Payout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Same street, `current` moved to the next seat
    Continue,
    /// A new street began
    StreetAdvanced(Stage),
    /// Pot settled; stage is `Showdown`
    HandOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub table: Table,
    pub events: Vec<HandEvent>,
    pub outcome: Outcome,
}

/// Next seat after `from`, wrapping, that satisfies `pred`.
fn next_seat(players: &[Player], from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
    let n = players.len();
    (1..=n).map(|k| (from + k) % n).find(|&s| pred(&players[s]))
}

fn funded(p: &Player) -> bool {
    p.stack > 0
}

fn round_mut(table: &mut Table) -> Result<&mut RoundState, GameError> {
    table
        .board
        .round
        .as_mut()
        .ok_or(GameError::NoHandInProgress)
}

/// Abort the hand: committed chips go back to their owners and every
/// hand-scoped field is cleared. `big_blind` and `dealer` are kept.
pub fn undeal(table: &Table) -> Table {
    let mut next = table.clone();
    for p in &mut next.players {
        p.stack += p.betted;
        p.clear_hand();
    }
    next.board.round = None;
    next
}

/// Start a new hand.
///
/// The dealer button moves to the next funded seat, blinds are posted as far
/// as stacks allow, every funded seat gets two cards and all five board
/// cards are drawn up front. When no one (or only a player already matching
/// the largest commitment) can act, the hand goes straight to showdown.
///
/// # Errors
///
/// - [`GameError::HandInProgress`] if the previous hand has not finished
/// - [`GameError::NotEnoughPlayers`] with fewer than two funded seats
pub fn deal<R: Rng + ?Sized>(table: &Table, rng: &mut R) -> Result<Transition, GameError> {
    if table.board.hand_in_progress() {
        return Err(GameError::HandInProgress);
    }
    let funded_count = table.players.iter().filter(|p| funded(p)).count();
    if funded_count < 2 {
        return Err(GameError::NotEnoughPlayers(funded_count));
    }

    let mut next = undeal(table);
    let n = next.players.len();
    let bb_value = next.board.big_blind;
    if bb_value == 0 {
        return Err(GameError::invalid_amount(bb_value, "big blind must be positive"));
    }

    let mut deck = Deck::shuffled(rng);
    for p in &mut next.players {
        p.reset_for_deal();
        if funded(p) {
            p.hole = Some([deck.deal_card()?, deck.deal_card()?]);
        }
    }
    let board_cards = [
        deck.deal_card()?,
        deck.deal_card()?,
        deck.deal_card()?,
        deck.deal_card()?,
        deck.deal_card()?,
    ];

    let no_seat = || GameError::InvariantViolation("no funded seat found".into());
    let start = next.board.dealer.map_or(0, |d| (d + 1) % n);
    let dealer = if funded(&next.players[start]) {
        start
    } else {
        next_seat(&next.players, start, funded).ok_or_else(no_seat)?
    };
    let heads_up = funded_count == 2;
    let sb = if heads_up {
        dealer
    } else {
        next_seat(&next.players, dealer, funded).ok_or_else(no_seat)?
    };
    let bb = next_seat(&next.players, sb, funded).ok_or_else(no_seat)?;

    let mut events = vec![HandEvent::HandStarted {
        dealer,
        small_blind: sb,
        big_blind: bb,
    }];
    let mut pot_total = 0;
    for (seat, due) in [(sb, bb_value / 2), (bb, bb_value)] {
        let amount = due.min(next.players[seat].stack);
        next.players[seat].commit(amount);
        pot_total += amount;
        events.push(HandEvent::BlindPosted { seat, amount });
    }

    next.board.dealer = Some(dealer);
    next.board.round = Some(RoundState {
        board_cards,
        pot: pot_total,
        bet_per_person: bb_value,
        min_raise: bb_value,
        stage: Stage::Preflop,
        small_blind: sb,
        big_blind: bb,
        current: None,
        current_leader: None,
        post_flop_leader: if heads_up { bb } else { sb },
    });

    let able: Vec<usize> = (0..n).filter(|&s| next.players[s].can_act()).collect();
    let top_commitment = next.players.iter().map(|p| p.betted).max().unwrap_or(0);
    let nothing_to_decide = match able.as_slice() {
        [] => true,
        [only] => next.players[*only].betted >= top_commitment,
        _ => false,
    };

    let outcome = if nothing_to_decide {
        finish_hand(&mut next, &mut events, rng)?
    } else {
        let leader = next_seat(&next.players, bb, Player::can_act).ok_or_else(no_seat)?;
        let round = round_mut(&mut next)?;
        round.current = Some(leader);
        round.current_leader = Some(leader);
        Outcome::Continue
    };

    Ok(Transition {
        table: next,
        events,
        outcome,
    })
}

/// Apply `action` for the player at `seat`.
///
/// # Errors
///
/// - [`GameError::NoHandInProgress`] before the first deal
/// - [`GameError::HandAlreadyComplete`] after showdown
/// - [`GameError::NotPlayersTurn`] when `seat` is not the seat to act
/// - [`GameError::InvalidAmount`] for a raise that is zero, exceeds the stack,
///   or falls short of the minimum without going all-in
/// - [`GameError::RaiseNotAllowed`] for a raise after a short all-in left the
///   action closed to this player
pub fn apply<R: Rng + ?Sized>(
    table: &Table,
    seat: usize,
    action: PlayerAction,
    rng: &mut R,
) -> Result<Transition, GameError> {
    let mut next = table.clone();
    let mut events = Vec::new();
    {
        let round = next.board.round.as_mut().ok_or(GameError::NoHandInProgress)?;
        if round.is_over() {
            return Err(GameError::HandAlreadyComplete);
        }
        let expected = round.current.ok_or(GameError::HandAlreadyComplete)?;
        if expected != seat {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: seat,
            });
        }
        let player = next
            .players
            .get(seat)
            .ok_or_else(|| GameError::InvariantViolation(format!("seat {seat} out of range")))?;

        match validate_action(round, player, action)? {
            ValidatedAction::Fold => {
                next.players[seat].hole = None;
                events.push(HandEvent::Folded { seat });
            }
            ValidatedAction::Call(amount) => {
                let player = &mut next.players[seat];
                player.commit(amount);
                player.can_raise = false;
                round.pot += amount;
                events.push(HandEvent::Called { seat, amount });
            }
            ValidatedAction::Raise {
                increment,
                committed,
                full,
            } => {
                next.players[seat].commit(committed);
                round.pot += committed;
                round.bet_per_person += increment;
                round.current_leader = Some(seat);
                if full {
                    round.min_raise = increment;
                    for p in &mut next.players {
                        p.can_raise = true;
                    }
                    next.players[seat].can_raise = false;
                }
                events.push(HandEvent::Raised {
                    seat,
                    increment,
                    committed,
                    reopened: full,
                });
            }
        }
    }

    let outcome = advance_turn(&mut next, &mut events, rng)?;
    Ok(Transition {
        table: next,
        events,
        outcome,
    })
}

/// Move `current` to the next seat that can act, closing the street when the
/// action gets back to the leader.
fn advance_turn<R: Rng + ?Sized>(
    table: &mut Table,
    events: &mut Vec<HandEvent>,
    rng: &mut R,
) -> Result<Outcome, GameError> {
    for p in &mut table.players {
        p.show = false;
    }
    if table.players_with_cards() <= 1 {
        return finish_hand(table, events, rng);
    }

    let n = table.players.len();
    let able = table.players_able_to_act();
    let (mut current, mut leader, post_flop_leader) = {
        let round = table.round()?;
        (
            round.current.ok_or(GameError::HandAlreadyComplete)?,
            round.current_leader.ok_or(GameError::HandAlreadyComplete)?,
            round.post_flop_leader,
        )
    };
    let mut new_street = None;

    // the leader is hit at most twice, so 2n + 1 steps always suffice
    for _ in 0..=2 * n {
        current = (current + 1) % n;
        if current == leader {
            if able < 2 {
                return finish_hand(table, events, rng);
            }
            let stage = next_street(table)?;
            events.push(HandEvent::StreetAdvanced { stage });
            if stage == Stage::Showdown {
                return finish_hand(table, events, rng);
            }
            new_street = Some(stage);
            current = post_flop_leader;
            leader = post_flop_leader;
        }
        if table.players[current].can_act() {
            let round = round_mut(table)?;
            round.current = Some(current);
            if new_street.is_some() {
                round.current_leader = Some(current);
            }
            return Ok(new_street.map_or(Outcome::Continue, Outcome::StreetAdvanced));
        }
    }
    Err(GameError::InvariantViolation(
        "no seat left to act and no street to close".into(),
    ))
}

fn next_street(table: &mut Table) -> Result<Stage, GameError> {
    let bb_value = table.board.big_blind;
    let round = round_mut(table)?;
    round.stage = round.stage.next();
    round.min_raise = bb_value;
    let stage = round.stage;
    for p in &mut table.players {
        p.can_raise = true;
    }
    Ok(stage)
}

fn finish_hand<R: Rng + ?Sized>(
    table: &mut Table,
    events: &mut Vec<HandEvent>,
    rng: &mut R,
) -> Result<Outcome, GameError> {
    let Table { players, board } = table;
    let round = board.round.as_mut().ok_or(GameError::NoHandInProgress)?;
    round.stage = Stage::Showdown;
    for p in players.iter_mut() {
        p.show = p.has_cards();
    }
    events.push(HandEvent::Showdown);

    let settlement = pot::settle(players, &round.board_cards, round.pot, rng)?;
    round.pot = 0;
    round.current = None;
    round.current_leader = None;

    events.extend(settlement.awards.into_iter().map(HandEvent::Awarded));
    events.extend(settlement.refunds.into_iter().map(HandEvent::Refunded));
    Ok(Outcome::HandOver)
}
