use core::fmt;

use serde::{Deserialize, Serialize};

pub const HAND_SIZE: usize = 5;
pub const DECK_SIZE: usize = 20;
/// Direct points needed to win a game.
pub const WINNING_POINTS: u32 = 66;

/// One of the four French suits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        };
        f.write_str(symbol)
    }
}

/// Card rank. Only Ace, Ten, King, Queen and Jack take part in Schnapsen,
/// the remaining ranks exist so foreign decks can still be described.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Ranks used by the 20-card Schnapsen deck, strongest first.
    pub const SCHNAPSEN: [Rank; 5] = [Rank::Ace, Rank::Ten, Rank::King, Rank::Queen, Rank::Jack];

    /// Ordinal value (Ace = 1 .. King = 13).
    pub const fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Schnapsen scoring value. Trick strength within a suit follows it too.
    pub const fn points(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        };
        f.write_str(text)
    }
}

/// A playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    #[inline]
    pub const fn points(&self) -> u32 {
        self.rank.points()
    }

    /// The other half of a marriage: King for a Queen and vice versa.
    pub fn marriage_partner(&self) -> Option<Card> {
        match self.rank {
            Rank::King => Some(Card::new(Rank::Queen, self.suit)),
            Rank::Queen => Some(Card::new(Rank::King, self.suit)),
            _ => None,
        }
    }

    /// True when this card takes `other` as the second card of a trick led by `other`.
    pub fn beats(&self, other: &Card, trump: Suit) -> bool {
        if self.suit == other.suit {
            self.points() > other.points()
        } else {
            self.suit == trump
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Builds the 20-card Schnapsen deck in deterministic order (unshuffled).
pub fn schnapsen_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::SCHNAPSEN {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Sum of point values.
pub fn card_points(cards: &[Card]) -> u32 {
    cards.iter().map(Card::points).sum()
}
