use serde::{Deserialize, Serialize};

use crate::action::{Move, PlayerId};
use crate::card::{Card, Suit};

/// Points of one player: trick points plus marriage points still waiting for a won trick.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub direct: u32,
    pub pending: u32,
}

impl Score {
    pub fn new(direct: u32, pending: u32) -> Self {
        Self { direct, pending }
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.direct + self.pending
    }

    /// Moves pending points to direct ones; happens whenever a trick is won.
    pub fn redeem_pending(&mut self) {
        self.direct += self.pending;
        self.pending = 0;
    }
}

/// Phase One lasts while the talon holds cards, Phase Two afterwards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    One,
    Two,
}

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Finished { winner: PlayerId, game_points: u32 },
}

/// Everything a player may observe when asked for a move.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPerspective {
    pub phase: GamePhase,
    pub hand: Vec<Card>,
    pub my_score: Score,
    pub opponent_score: Score,
    pub trump_suit: Suit,
    /// Face-up trump card at the bottom of the talon; gone in Phase Two.
    pub trump_card: Option<Card>,
    pub talon_size: usize,
    pub is_leader: bool,
    /// Cards revealed so far: won tricks, shown marriage kings, the trump card.
    pub seen: Vec<Card>,
    /// Known only in Phase Two.
    pub opponent_hand: Option<Vec<Card>>,
    pub valid_moves: Vec<Move>,
}

impl PlayerPerspective {
    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn my_score(&self) -> Score {
        self.my_score
    }

    pub fn opponent_score(&self) -> Score {
        self.opponent_score
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Revealed cards including those of the move led this trick.
    pub fn seen_cards(&self, leader_move: Option<&Move>) -> Vec<Card> {
        let mut seen = self.seen.clone();
        if let Some(lead) = leader_move {
            for card in lead.cards() {
                if !seen.contains(&card) {
                    seen.push(card);
                }
            }
        }
        seen
    }

    pub fn opponent_hand_in_phase_two(&self) -> Option<&[Card]> {
        match self.phase {
            GamePhase::Two => self.opponent_hand.as_deref(),
            GamePhase::One => None,
        }
    }

    pub fn is_valid(&self, candidate: &Move) -> bool {
        self.valid_moves.contains(candidate)
    }
}
