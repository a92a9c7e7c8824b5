//! Schnapsen engine and rule-based bots, centred on a card-weighting strategy bot.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod error;
pub mod game;
pub mod logging;
pub mod score;
pub mod state;
pub mod visualize;

pub use crate::action::{Move, PlayerId};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, label_for_spec};
pub use crate::bots::{HumanBot, RandomBot, StrategyBot, StrategyParams};
pub use crate::card::{Card, Rank, Suit};
pub use crate::error::{ConfigError, GameError, InvalidMove};
pub use crate::game::{Game, GameBuilder, GameConfig, Trick, play_game};
pub use crate::score::game_points;
pub use crate::state::{GamePhase, GameStatus, PlayerPerspective, Score};
pub use crate::visualize::{VisualOptions, describe_move, render_perspective};
