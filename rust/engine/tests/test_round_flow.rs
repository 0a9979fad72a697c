use homegame_engine::board::{Board, Stage, Table};
use homegame_engine::errors::{ErrorKind, GameError};
use homegame_engine::player::{Player, PlayerAction, PlayerId};
use homegame_engine::round::{apply, deal, HandEvent, Outcome, Transition};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn table(stacks: &[u64]) -> Table {
    let players = stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(PlayerId::new(format!("p{i}")), format!("P{i}"), s))
        .collect();
    Table::new(players, Board::new(100))
}

fn current(t: &Table) -> usize {
    t.round().unwrap().current.expect("someone to act")
}

fn assert_pot_matches(t: &Table) {
    assert_eq!(t.board.pot(), t.committed(), "pot must equal committed chips");
}

/// Everyone calls until the hand is over.
fn check_down(mut t: Transition, rng: &mut ChaCha20Rng) -> Transition {
    while t.outcome != Outcome::HandOver {
        let seat = current(&t.table);
        t = apply(&t.table, seat, PlayerAction::Call, rng).unwrap();
        assert_pot_matches(&t.table);
    }
    t
}

#[test]
fn blinds_and_positions_for_three_players() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let round = t.table.round().unwrap();
    assert_eq!(t.table.board.dealer, Some(0));
    assert_eq!((round.small_blind, round.big_blind), (1, 2));
    assert_eq!(round.current, Some(0));
    assert_eq!(round.current_leader, Some(0));
    assert_eq!(round.post_flop_leader, 1);
    assert_eq!(round.pot, 150);
    assert_eq!(round.bet_per_person, 100);
    assert!(round.revealed().is_empty());
    assert!(t.table.players.iter().all(|p| p.has_cards() && p.can_raise));
    assert_eq!(
        t.events[1..],
        [
            HandEvent::BlindPosted { seat: 1, amount: 50 },
            HandEvent::BlindPosted { seat: 2, amount: 100 }
        ]
    );
}

#[test]
fn zero_stack_seat_is_not_dealt_in() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let t = deal(&table(&[1000, 0, 1000]), &mut rng).unwrap();
    let round = t.table.round().unwrap();
    assert!(!t.table.players[1].has_cards());
    // heads-up between seats 0 and 2: dealer posts the small blind
    assert_eq!((round.small_blind, round.big_blind), (0, 2));
    assert_eq!(round.post_flop_leader, 2);
}

#[test]
fn dealer_moves_each_hand() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let first = check_down(deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap(), &mut rng);
    assert_eq!(first.table.board.dealer, Some(0));
    let second = deal(&first.table, &mut rng).unwrap();
    assert_eq!(second.table.board.dealer, Some(1));
    assert_eq!(second.table.round().unwrap().small_blind, 2);
}

#[test]
fn big_blind_gets_option_then_flop_opens_at_small_blind() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let t = apply(&t.table, 0, PlayerAction::Call, &mut rng).unwrap();
    let t = apply(&t.table, 1, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::Continue);
    assert_eq!(current(&t.table), 2);
    let t = apply(&t.table, 2, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::StreetAdvanced(Stage::Flop));
    let round = t.table.round().unwrap();
    assert_eq!(round.current, Some(1));
    assert_eq!(round.current_leader, Some(1));
    assert_eq!(round.revealed().len(), 3);
    assert_eq!(round.pot, 300);
}

#[test]
fn folded_seat_is_skipped_for_rest_of_hand() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let mut t = apply(&t.table, 0, PlayerAction::Fold, &mut rng).unwrap();
    assert!(!t.table.players[0].has_cards());
    while t.outcome != Outcome::HandOver {
        let seat = current(&t.table);
        assert_ne!(seat, 0, "folded seat must never act");
        t = apply(&t.table, seat, PlayerAction::Call, &mut rng).unwrap();
    }
    assert_eq!(t.table.board.stage(), Some(Stage::Showdown));
    assert_eq!(t.table.players[0].stack, 1000);
}

#[test]
fn folded_big_blind_is_skipped_at_four_seats() {
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let t = deal(&table(&[1000, 1000, 1000, 1000]), &mut rng).unwrap();
    assert_eq!(current(&t.table), 3);
    let t = apply(&t.table, 3, PlayerAction::Call, &mut rng).unwrap();
    let t = apply(&t.table, 0, PlayerAction::Call, &mut rng).unwrap();
    let t = apply(&t.table, 1, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(current(&t.table), 2);
    let mut t = apply(&t.table, 2, PlayerAction::Fold, &mut rng).unwrap();
    assert!(!t.table.players[2].has_cards());
    while t.outcome != Outcome::HandOver {
        let seat = current(&t.table);
        assert_ne!(seat, 2, "folded seat must never act");
        t = apply(&t.table, seat, PlayerAction::Call, &mut rng).unwrap();
        assert_pot_matches(&t.table);
    }
    assert_eq!(t.table.board.stage(), Some(Stage::Showdown));
    assert_eq!(t.table.players[2].stack, 900);
    assert_eq!(t.table.total_chips(), 4000);
}

#[test]
fn last_player_holding_cards_wins_without_showdown_cards() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let t = apply(&t.table, 0, PlayerAction::Fold, &mut rng).unwrap();
    let t = apply(&t.table, 1, PlayerAction::Fold, &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::HandOver);
    let stacks: Vec<u64> = t.table.players.iter().map(|p| p.stack).collect();
    assert_eq!(stacks, vec![1000, 950, 1050]);
    let round = t.table.round().unwrap();
    assert_eq!(round.pot, 0);
    assert_eq!(round.current, None);
    assert_eq!(round.current_leader, None);
}

#[test]
fn full_raise_reopens_and_short_raise_does_not() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let t = deal(&table(&[1000, 250, 1000]), &mut rng).unwrap();

    let t = apply(&t.table, 0, PlayerAction::Raise(100), &mut rng).unwrap();
    let round = t.table.round().unwrap();
    assert_eq!(round.bet_per_person, 200);
    assert_eq!(round.min_raise, 100);
    assert_eq!(round.current_leader, Some(0));
    assert!(!t.table.players[0].can_raise);
    assert!(t.table.players[1].can_raise && t.table.players[2].can_raise);
    assert_eq!(t.table.players[0].betted, 200);

    // small blind has 200 behind and raises all-in by 50
    let t = apply(&t.table, 1, PlayerAction::Raise(50), &mut rng).unwrap();
    let round = t.table.round().unwrap();
    assert_eq!(round.bet_per_person, 250);
    assert_eq!(round.min_raise, 100, "short raise keeps the minimum");
    assert_eq!(round.current_leader, Some(1));
    assert!(!t.table.players[0].can_raise, "short raise must not reopen");
    assert_eq!(t.table.players[1].stack, 0);
    assert_eq!(t.table.players[1].betted, 250);
    assert!(matches!(
        t.events[0],
        HandEvent::Raised { reopened: false, .. }
    ));
    assert_pot_matches(&t.table);

    assert!(t.table.players[2].can_raise);
    let t = apply(&t.table, 2, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(current(&t.table), 0);

    let err = apply(&t.table, 0, PlayerAction::Raise(500), &mut rng).unwrap_err();
    assert_eq!(err, GameError::RaiseNotAllowed);
    assert_eq!(err.kind(), ErrorKind::IllegalAction);

    let t = apply(&t.table, 0, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::StreetAdvanced(Stage::Flop));
    assert_pot_matches(&t.table);
}

#[test]
fn short_raise_from_deep_stack_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let t = apply(&t.table, 0, PlayerAction::Raise(100), &mut rng).unwrap();
    let err = apply(&t.table, 1, PlayerAction::Raise(50), &mut rng).unwrap_err();
    assert!(matches!(err, GameError::InvalidAmount { .. }));
    assert_eq!(current(&t.table), 1);
}

#[test]
fn raise_beyond_stack_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let t = deal(&table(&[1000, 1000, 1000]), &mut rng).unwrap();
    let err = apply(&t.table, 0, PlayerAction::Raise(901), &mut rng).unwrap_err();
    assert!(matches!(err, GameError::InvalidAmount { .. }));
    let err = apply(&t.table, 0, PlayerAction::Raise(0), &mut rng).unwrap_err();
    assert!(matches!(err, GameError::InvalidAmount { .. }));
}

#[test]
fn heads_up_all_in_runs_to_showdown() {
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let t = deal(&table(&[1000, 1000]), &mut rng).unwrap();
    let t = apply(&t.table, 0, PlayerAction::Raise(900), &mut rng).unwrap();
    assert_eq!(t.table.players[0].stack, 0);
    assert_eq!(current(&t.table), 1);
    let t = apply(&t.table, 1, PlayerAction::Call, &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::HandOver);
    assert_eq!(t.table.total_chips(), 2000);
    let round = t.table.round().unwrap();
    assert_eq!(round.revealed().len(), 5);
    assert!(t.table.players.iter().all(|p| p.show && p.score.is_some()));
    assert!(t.events.contains(&HandEvent::Showdown));
}

#[test]
fn short_stacked_small_blind_goes_straight_to_showdown() {
    let mut rng = ChaCha20Rng::seed_from_u64(10);
    let t = deal(&table(&[30, 1000]), &mut rng).unwrap();
    assert_eq!(t.outcome, Outcome::HandOver);
    assert_eq!(t.table.board.stage(), Some(Stage::Showdown));
    assert_eq!(t.table.total_chips(), 1030);
    assert!(t.table.players.iter().all(|p| p.betted == 0));
}

#[test]
fn deal_needs_two_funded_players() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    assert_eq!(
        deal(&table(&[1000, 0]), &mut rng),
        Err(GameError::NotEnoughPlayers(1))
    );
}

#[test]
fn acting_after_showdown_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let done = check_down(deal(&table(&[500, 500]), &mut rng).unwrap(), &mut rng);
    assert_eq!(
        apply(&done.table, 0, PlayerAction::Call, &mut rng),
        Err(GameError::HandAlreadyComplete)
    );
    assert_eq!(
        apply(&table(&[500, 500]), 0, PlayerAction::Call, &mut rng),
        Err(GameError::NoHandInProgress)
    );
}

#[test]
fn chips_conserved_over_many_seeded_hands() {
    for seed in 0..25u64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut t = deal(&table(&[300, 800, 150, 1000]), &mut rng).unwrap();
        let mut step = 0u64;
        while t.outcome != Outcome::HandOver {
            let seat = current(&t.table);
            let action = match (step + seed) % 4 {
                0 => PlayerAction::Raise(100),
                1 => PlayerAction::Fold,
                _ => PlayerAction::Call,
            };
            t = apply(&t.table, seat, action, &mut rng)
                .or_else(|_| apply(&t.table, seat, PlayerAction::Call, &mut rng))
                .unwrap();
            assert_pot_matches(&t.table);
            assert_eq!(t.table.total_chips(), 2250);
            step += 1;
        }
        assert_eq!(t.table.board.pot(), 0);
        assert!(t.table.players.iter().all(|p| p.betted == 0));
    }
}

#[test]
fn same_seed_same_hand() {
    let a = deal(&table(&[1000, 1000, 1000]), &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
    let b = deal(&table(&[1000, 1000, 1000]), &mut ChaCha20Rng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
}
