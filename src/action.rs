use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit};

/// Zero-based index of a player within the game (0 or 1).
pub type PlayerId = usize;

/// Move available to a player during a trick.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Play a single card.
    Regular(Card),
    /// Declare a King+Queen pair of one suit and play the Queen.
    Marriage { queen: Card, king: Card },
    /// Swap the trump Jack in hand for the face-up trump card.
    TrumpExchange { jack: Card },
}

impl Move {
    pub fn marriage(suit: Suit) -> Self {
        Move::Marriage {
            queen: Card::new(Rank::Queen, suit),
            king: Card::new(Rank::King, suit),
        }
    }

    pub fn trump_exchange(trump: Suit) -> Self {
        Move::TrumpExchange {
            jack: Card::new(Rank::Jack, trump),
        }
    }

    /// All cards the move involves.
    pub fn cards(&self) -> Vec<Card> {
        match self {
            Move::Regular(card) => vec![*card],
            Move::Marriage { queen, king } => vec![*queen, *king],
            Move::TrumpExchange { jack } => vec![*jack],
        }
    }

    /// The card that lands on the table, if the move plays one.
    pub fn played_card(&self) -> Option<Card> {
        match self {
            Move::Regular(card) => Some(*card),
            Move::Marriage { queen, .. } => Some(*queen),
            Move::TrumpExchange { .. } => None,
        }
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        !matches!(self, Move::Regular(_))
    }
}
