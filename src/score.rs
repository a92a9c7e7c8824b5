//! Game-point award for finished Schnapsen games.
//!
//! The winner receives:
//!   3 game points when the loser took no trick points at all,
//!   2 game points when the loser stayed below 33,
//!   1 game point otherwise.

use crate::state::Score;

/// Loser threshold below which the winner is awarded two game points.
pub const SCHNEIDER_THRESHOLD: u32 = 33;

/// Compute the winner's game points from the loser's final score.
///
/// Only direct points count; marriages that never led to a won trick are worthless.
pub fn game_points(loser: Score) -> u32 {
    if loser.direct == 0 {
        3
    } else if loser.direct < SCHNEIDER_THRESHOLD {
        2
    } else {
        1
    }
}
