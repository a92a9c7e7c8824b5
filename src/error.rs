use thiserror::Error;

use crate::action::PlayerId;
use crate::card::Card;

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("not the specified player's turn")]
    NotPlayersTurn,
    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    #[error("game is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Details of moves the rules reject.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("only the leader may declare marriages or exchange the trump jack")]
    NotLeader,
    #[error("marriage cannot be declared")]
    MarriageUnavailable,
    #[error("trump jack cannot be exchanged")]
    TrumpExchangeUnavailable,
    #[error("card {played} breaks the follow rules, expected one of {required}")]
    MustFollow { played: Card, required: String },
}

/// Failures while loading strategy parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
}
