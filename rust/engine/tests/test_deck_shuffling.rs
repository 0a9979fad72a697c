use std::collections::{HashMap, HashSet};

use homegame_engine::cards::Card;
use homegame_engine::deck::Deck;
use homegame_engine::errors::GameError;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn deck_yields_52_distinct_cards() {
    let mut deck = Deck::new_with_seed(42);
    let mut seen = HashSet::new();
    for i in 0..52 {
        let c = deck.deal_card().expect("should have 52 cards");
        assert!(seen.insert(c), "card {c} duplicated at position {i}");
    }
    assert_eq!(deck.deal_card(), Err(GameError::DeckExhausted));
}

#[test]
fn same_seed_same_order() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    let a: Vec<Card> = d1.deal_n(52).unwrap();
    let b: Vec<Card> = d2.deal_n(52).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn different_seeds_differ() {
    let a = Deck::new_with_seed(1).deal_n(10).unwrap();
    let b = Deck::new_with_seed(2).deal_n(10).unwrap();
    assert_ne!(a, b);
}

#[test]
fn top_card_is_roughly_uniform() {
    const DECKS: usize = 5200;
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut counts: HashMap<Card, usize> = HashMap::new();
    for _ in 0..DECKS {
        let mut deck = Deck::shuffled(&mut rng);
        *counts.entry(deck.deal_card().unwrap()).or_default() += 1;
    }
    assert_eq!(counts.len(), 52, "every card should appear on top");
    // expected 100 per card, standard deviation about 10
    for (card, n) in counts {
        assert!((50..=160).contains(&n), "{card} on top {n} times");
    }
}

#[test]
fn ordered_deck_is_unshuffled() {
    let mut deck = Deck::ordered();
    assert_eq!(deck.deal_card().unwrap().to_string(), "2s");
    assert_eq!(deck.remaining(), 51);
}
