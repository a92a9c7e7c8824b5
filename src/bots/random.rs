use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Move;
use crate::bot::Bot;
use crate::state::PlayerPerspective;

/// Baseline bot that samples uniformly from the legal move set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_move(&mut self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> Move {
        *perspective
            .valid_moves()
            .choose(&mut self.rng)
            .expect("at least one legal move must be available")
    }
}
