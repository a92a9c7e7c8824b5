use crate::action::Move;
use crate::state::PlayerPerspective;

/// Interface for defining custom Schnapsen bots.
///
/// `leader_move` is the opponent's move of the current trick, `None` when the bot leads.
pub trait Bot {
    fn select_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
}
