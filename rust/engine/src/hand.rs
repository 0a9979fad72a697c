use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

const CATEGORY_SHIFT: u32 = 20;
const NIBBLE_MASK: u32 = 0xF;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    fn from_bits(v: u32) -> Option<Category> {
        Some(match v {
            0 => Category::HighCard,
            1 => Category::OnePair,
            2 => Category::TwoPair,
            3 => Category::ThreeOfAKind,
            4 => Category::Straight,
            5 => Category::Flush,
            6 => Category::FullHouse,
            7 => Category::FourOfAKind,
            8 => Category::StraightFlush,
            9 => Category::RoyalFlush,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// Packed hand strength: `(category << 20) | tiebreak`, where the tiebreak is
/// up to five 4-bit rank ordinals with the most significant kicker in the
/// highest used nibble. Plain integer comparison orders hands.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HandScore(u32);

impl HandScore {
    pub fn from_value(value: u32) -> Self {
        HandScore(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// `None` only for values that were not produced by [`rank`].
    pub fn category(self) -> Option<Category> {
        Category::from_bits(self.0 >> CATEGORY_SHIFT)
    }

    /// Rank ordinal stored at nibble `i` (0 = least significant).
    pub fn nibble(self, i: u32) -> u8 {
        ((self.0 >> (4 * i)) & NIBBLE_MASK) as u8
    }

    pub fn describe(self) -> String {
        let r = |i: u32| {
            Rank::from_ordinal(self.nibble(i))
                .map(Rank::to_char)
                .unwrap_or('?')
        };
        let Some(category) = self.category() else {
            return format!("Unknown hand ({:#x})", self.0);
        };
        let name = category.name();
        match category {
            Category::RoyalFlush => name.to_string(),
            Category::StraightFlush | Category::Straight => format!("{name}: {} high", r(0)),
            Category::FourOfAKind => format!("{name}: {}s with {} kicker", r(1), r(0)),
            Category::FullHouse => format!("{name}: {}s over {}s", r(1), r(0)),
            Category::ThreeOfAKind => {
                format!("{name}: {}s with {} and {} kickers", r(2), r(1), r(0))
            }
            Category::TwoPair => format!("{name}: {}s and {}s with {} kicker", r(2), r(1), r(0)),
            Category::OnePair => format!(
                "{name}: {}s with {}, {}, and {} kickers",
                r(3),
                r(2),
                r(1),
                r(0)
            ),
            Category::Flush | Category::HighCard => format!(
                "{name}: {}, {}, {}, {}, {}",
                r(4),
                r(3),
                r(2),
                r(1),
                r(0)
            ),
        }
    }
}

impl fmt::Display for HandScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// nibbles are given most significant first
fn pack(category: Category, nibbles: &[u8]) -> HandScore {
    let tiebreak = nibbles
        .iter()
        .fold(0u32, |acc, &n| (acc << 4) | u32::from(n));
    HandScore(((category as u32) << CATEGORY_SHIFT) | tiebreak)
}

/// Rank exactly five cards.
pub fn rank(cards: &[Card; 5]) -> HandScore {
    let mut ranks = cards.map(|c| c.rank.ordinal());
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let wheel = ranks == [12, 3, 2, 1, 0];
    let straight = wheel || ranks.windows(2).all(|w| w[0] == w[1] + 1);
    let high = if wheel { 3 } else { ranks[0] };

    if flush && straight {
        if ranks == [12, 11, 10, 9, 8] {
            return pack(Category::RoyalFlush, &[]);
        }
        return pack(Category::StraightFlush, &[high]);
    }

    // (count, rank), larger groups first, higher rank first within a size
    let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
    for &r in &ranks {
        match groups.last_mut() {
            Some((count, rank)) if *rank == r => *count += 1,
            _ => groups.push((1, r)),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    let g = |i: usize| groups.get(i).map(|&(_, r)| r).unwrap_or(0);

    match (groups[0].0, groups.get(1).map(|&(c, _)| c)) {
        (4, _) => pack(Category::FourOfAKind, &[g(0), g(1)]),
        (3, Some(2)) => pack(Category::FullHouse, &[g(0), g(1)]),
        _ if flush => pack(Category::Flush, &ranks),
        _ if straight => pack(Category::Straight, &[high]),
        (3, _) => pack(Category::ThreeOfAKind, &[g(0), g(1), g(2)]),
        (2, Some(2)) => pack(Category::TwoPair, &[g(0), g(1), g(2)]),
        (2, _) => pack(Category::OnePair, &[g(0), g(1), g(2), g(3)]),
        _ => pack(Category::HighCard, &ranks),
    }
}

/// Best five-card score out of 5..=7 cards; `None` outside that range.
pub fn best_of(cards: &[Card]) -> Option<HandScore> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return None;
    }
    (0u32..(1 << n))
        .filter(|mask| mask.count_ones() == 5)
        .map(|mask| {
            let mut five = [cards[0]; 5];
            let picked = (0..n).filter(|i| mask & (1 << i) != 0);
            for (slot, i) in five.iter_mut().zip(picked) {
                *slot = cards[i];
            }
            rank(&five)
        })
        .max()
}

/// Best score over all 21 five-card subsets of two hole cards plus the board.
pub fn best(cards: &[Card; 7]) -> HandScore {
    best_of(cards).unwrap_or_default()
}

pub fn describe(score: HandScore) -> String {
    score.describe()
}
