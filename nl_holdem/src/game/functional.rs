//! Hand evaluation over 5 to 7 cards.
//!
//! [`eval`] condenses a card set into a [`HandScore`], a lexicographically
//! comparable (category, tie-breakers) tuple. Comparing two scores with the
//! derived ordering settles any showdown; [`argmax`] picks the winners of a
//! pot in one pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::{Card, Suit, Value, VALUE_ACE, VALUE_MIN};

/// Hand categories, weakest first so the derived ordering matches
/// poker strength.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// The comparable result of evaluating a hand.
///
/// `values` holds the category's tie-breakers in significance order; two
/// scores of the same rank always carry the same number of values, so the
/// derived lexicographic ordering is total.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandScore {
    pub rank: Rank,
    pub values: Vec<Value>,
}

impl HandScore {
    fn new(rank: Rank, values: Vec<Value>) -> Self {
        Self { rank, values }
    }
}

impl fmt::Display for HandScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self.rank {
            Rank::StraightFlush => {
                format!("straight flush, {} high", value_name(self.values[0]))
            }
            Rank::FourOfAKind => format!("four of a kind, {}", plural(self.values[0])),
            Rank::FullHouse => format!(
                "full house, {} full of {}",
                plural(self.values[0]),
                plural(self.values[1])
            ),
            Rank::Flush => format!("flush, {} high", value_name(self.values[0])),
            Rank::Straight => format!("straight, {} high", value_name(self.values[0])),
            Rank::ThreeOfAKind => {
                format!("three of a kind, {}", plural(self.values[0]))
            }
            Rank::TwoPair => format!(
                "two pair, {} and {}",
                plural(self.values[0]),
                plural(self.values[1])
            ),
            Rank::OnePair => format!("pair of {}", plural(self.values[0])),
            Rank::HighCard => format!("{} high", value_name(self.values[0])),
        };
        write!(f, "{repr}")
    }
}

fn value_name(value: Value) -> &'static str {
    match value {
        2 => "deuce",
        3 => "three",
        4 => "four",
        5 => "five",
        6 => "six",
        7 => "seven",
        8 => "eight",
        9 => "nine",
        10 => "ten",
        11 => "jack",
        12 => "queen",
        13 => "king",
        _ => "ace",
    }
}

fn plural(value: Value) -> &'static str {
    match value {
        2 => "deuces",
        3 => "threes",
        4 => "fours",
        5 => "fives",
        6 => "sixes",
        7 => "sevens",
        8 => "eights",
        9 => "nines",
        10 => "tens",
        11 => "jacks",
        12 => "queens",
        13 => "kings",
        _ => "aces",
    }
}

/// Evaluate the best 5-card hand contained in 5 to 7 cards.
///
/// Categories are tried strongest first; the first match wins, and every
/// category's kickers exclude the values it already consumed.
#[must_use]
pub fn eval(cards: &[Card]) -> HandScore {
    debug_assert!(
        (5..=7).contains(&cards.len()),
        "eval expects 5 to 7 cards, got {}",
        cards.len()
    );

    // Value frequencies plus the values held by each suit.
    let mut counts = [0u8; (VALUE_ACE + 1) as usize];
    let mut by_suit: [Vec<Value>; 4] = Default::default();
    for card in cards {
        counts[card.0 as usize] += 1;
        by_suit[suit_index(card.1)].push(card.0);
    }

    let flush_suit = by_suit.iter().position(|values| values.len() >= 5);

    // Straight flush: a straight within the flush suit's values.
    if let Some(suit) = flush_suit {
        if let Some(high) = top_straight(&presence(&by_suit[suit])) {
            return HandScore::new(Rank::StraightFlush, vec![high]);
        }
    }

    if let Some(quad) = highest_with_count(&counts, 4) {
        let kicker = kickers(&counts, &[quad], 1);
        return HandScore::new(Rank::FourOfAKind, [vec![quad], kicker].concat());
    }

    // Full house: highest trips, paired with the highest other value that
    // appears at least twice (a second trips counts as the pair).
    if let Some(trips) = highest_with_count(&counts, 3) {
        let pair = (VALUE_MIN..=VALUE_ACE)
            .rev()
            .find(|&v| v != trips && counts[v as usize] >= 2);
        if let Some(pair) = pair {
            return HandScore::new(Rank::FullHouse, vec![trips, pair]);
        }
    }

    if let Some(suit) = flush_suit {
        let mut values = by_suit[suit].clone();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.truncate(5);
        return HandScore::new(Rank::Flush, values);
    }

    if let Some(high) = top_straight(&presence_from_counts(&counts)) {
        return HandScore::new(Rank::Straight, vec![high]);
    }

    if let Some(trips) = highest_with_count(&counts, 3) {
        let kick = kickers(&counts, &[trips], 2);
        return HandScore::new(Rank::ThreeOfAKind, [vec![trips], kick].concat());
    }

    let mut pairs: Vec<Value> = (VALUE_MIN..=VALUE_ACE)
        .rev()
        .filter(|&v| counts[v as usize] == 2)
        .collect();
    pairs.truncate(2);
    match pairs.as_slice() {
        [hi, lo] => {
            let kicker = kickers(&counts, &[*hi, *lo], 1);
            HandScore::new(Rank::TwoPair, [vec![*hi, *lo], kicker].concat())
        }
        [pair] => {
            let kick = kickers(&counts, &[*pair], 3);
            HandScore::new(Rank::OnePair, [vec![*pair], kick].concat())
        }
        _ => HandScore::new(Rank::HighCard, kickers(&counts, &[], 5)),
    }
}

/// Indices of every score tied for the maximum, in input order.
#[must_use]
pub fn argmax(scores: &[HandScore]) -> Vec<usize> {
    let Some(best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, score)| *score == best)
        .map(|(i, _)| i)
        .collect()
}

fn suit_index(suit: Suit) -> usize {
    match suit {
        Suit::Club => 0,
        Suit::Spade => 1,
        Suit::Diamond => 2,
        Suit::Heart => 3,
    }
}

fn presence(values: &[Value]) -> [bool; (VALUE_ACE + 1) as usize] {
    let mut present = [false; (VALUE_ACE + 1) as usize];
    for &v in values {
        present[v as usize] = true;
    }
    present
}

fn presence_from_counts(counts: &[u8; (VALUE_ACE + 1) as usize]) -> [bool; (VALUE_ACE + 1) as usize] {
    let mut present = [false; (VALUE_ACE + 1) as usize];
    for v in VALUE_MIN..=VALUE_ACE {
        present[v as usize] = counts[v as usize] > 0;
    }
    present
}

/// Highest value of a run of five consecutive present values, if any.
/// The wheel (A-2-3-4-5) counts with the five on top.
fn top_straight(present: &[bool; (VALUE_ACE + 1) as usize]) -> Option<Value> {
    for high in (6..=VALUE_ACE).rev() {
        if (high - 4..=high).all(|v| present[v as usize]) {
            return Some(high);
        }
    }
    let wheel = present[VALUE_ACE as usize] && (2..=5).all(|v| present[v as usize]);
    wheel.then_some(5)
}

fn highest_with_count(counts: &[u8; (VALUE_ACE + 1) as usize], count: u8) -> Option<Value> {
    (VALUE_MIN..=VALUE_ACE)
        .rev()
        .find(|&v| counts[v as usize] == count)
}

/// The `n` highest present values outside `exclude`.
fn kickers(
    counts: &[u8; (VALUE_ACE + 1) as usize],
    exclude: &[Value],
    n: usize,
) -> Vec<Value> {
    (VALUE_MIN..=VALUE_ACE)
        .rev()
        .filter(|v| counts[*v as usize] > 0 && !exclude.contains(v))
        .take(n)
        .collect()
}
