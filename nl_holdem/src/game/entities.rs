use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::VecDeque, fmt};

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Card values run 2..=14 with the ace high at 14. The wheel straight
/// treats the ace as low during evaluation only.
pub type Value = u8;

pub const VALUE_MIN: Value = 2;
pub const VALUE_ACE: Value = 14;

/// A card is a tuple of a value (2=deuce ... 14=ace) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            14 => write!(f, "A{}", self.1),
            13 => write!(f, "K{}", self.1),
            12 => write!(f, "Q{}", self.1),
            11 => write!(f, "J{}", self.1),
            v => write!(f, "{v}{}", self.1),
        }
    }
}

/// An ordered run of cards. Cards are drawn by popping from the end.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 52 cards in a fixed, deterministic order.
    #[must_use]
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for value in VALUE_MIN..=VALUE_ACE {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        Self { cards }
    }

    /// Build a deck from an explicit card order. The card at the end of
    /// `cards` is drawn first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Where each hand's deck comes from. Production tables shuffle a fresh
/// deck per hand; tests inject pre-arranged orders.
pub trait DeckSource: Send {
    fn next_deck(&mut self) -> Deck;
}

/// Shuffles a standard deck with a freshly seeded RNG for every hand.
/// The RNG never outlives the shuffle, so its state is unobservable.
#[derive(Debug, Default)]
pub struct ShuffledDeckSource;

impl DeckSource for ShuffledDeckSource {
    fn next_deck(&mut self) -> Deck {
        let mut deck = Deck::standard();
        let mut rng = StdRng::from_entropy();
        deck.shuffle(&mut rng);
        deck
    }
}

/// Yields pre-arranged decks in order, then falls back to unshuffled
/// standard decks.
#[derive(Debug, Default)]
pub struct FixedDeckSource {
    decks: VecDeque<Deck>,
}

impl FixedDeckSource {
    #[must_use]
    pub fn new(decks: Vec<Deck>) -> Self {
        Self {
            decks: decks.into(),
        }
    }
}

impl DeckSource for FixedDeckSource {
    fn next_deck(&mut self) -> Deck {
        self.decks.pop_front().unwrap_or_else(Deck::standard)
    }
}

/// Type alias for whole chips. All bets and stacks are whole chips;
/// the buy-in cap keeps six stacks comfortably inside a u32.
pub type Chips = u32;

/// Type alias for seat positions at the table.
pub type SeatIndex = usize;

/// Opaque per-connection identity assigned by the transport.
pub type ClientId = u64;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        username.truncate(constants::MAX_USERNAME_LEN);
        Self(username)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// An occupied seat. The stack is mutated exclusively by the engine.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub client: ClientId,
    pub name: Username,
    pub stack: Chips,
}

impl Player {
    #[must_use]
    pub fn new(client: ClientId, name: Username, stack: Chips) -> Self {
        Self {
            client,
            name,
            stack,
        }
    }
}

/// A player's voluntary move during a betting round. The variant set is
/// closed; unknown tags are rejected at the wire.
///
/// `Bet` and `Raise` carry the raise increment above the current highest
/// bet, not the total commitment.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
    AllIn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds".to_string(),
            Self::Check => "checks".to_string(),
            Self::Call => "calls".to_string(),
            Self::Bet(amount) => format!("bets {amount}"),
            Self::Raise(amount) => format!("raises {amount}"),
            Self::AllIn => "goes all-in".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Phase of the table's current hand. `Idle` means no hand is running.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandPhase {
    Idle,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl HandPhase {
    /// True during the four streets where voluntary actions are legal.
    #[must_use]
    pub fn is_betting(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }
}

impl fmt::Display for HandPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "idle",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}
