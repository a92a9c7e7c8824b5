use std::fmt::Write;

use crate::action::Move;
use crate::card::Card;
use crate::state::{GamePhase, PlayerPerspective};

/// Customize perspective rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_seen_cards: bool,
    pub show_points: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_seen_cards: true,
            show_points: true,
        }
    }
}

pub fn render_perspective(perspective: &PlayerPerspective) -> String {
    render_perspective_with_options(perspective, VisualOptions::default())
}

pub fn render_perspective_with_options(
    perspective: &PlayerPerspective,
    options: VisualOptions,
) -> String {
    let mut out = String::new();
    let phase = match perspective.phase {
        GamePhase::One => "One (talon open)",
        GamePhase::Two => "Two (talon exhausted)",
    };
    let _ = writeln!(out, "Phase: {phase}");
    let trump_card = perspective
        .trump_card
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let _ = writeln!(
        out,
        "Trump: {}  |  Face-up: {}  |  Talon: {}",
        perspective.trump_suit, trump_card, perspective.talon_size
    );
    let role = if perspective.is_leader {
        "leader"
    } else {
        "follower"
    };
    let _ = writeln!(out, "Role: {role}");
    if options.show_points {
        let _ = writeln!(
            out,
            "Score: you {} (+{} pending)  |  opponent {} (+{} pending)",
            perspective.my_score.direct,
            perspective.my_score.pending,
            perspective.opponent_score.direct,
            perspective.opponent_score.pending
        );
    }
    let _ = writeln!(out, "Hand: {}", format_cards(&perspective.hand));
    if let Some(opponent) = perspective.opponent_hand_in_phase_two() {
        let _ = writeln!(out, "Opponent hand: {}", format_cards(opponent));
    }
    if options.show_seen_cards {
        let _ = writeln!(out, "Seen: {}", format_cards(&perspective.seen));
    }
    out
}

pub fn describe_move(mv: &Move) -> String {
    match mv {
        Move::Regular(card) => format!("Play {card}"),
        Move::Marriage { queen, king } => {
            format!("Declare marriage {king}+{queen}, playing {queen}")
        }
        Move::TrumpExchange { jack } => format!("Exchange {jack} for the face-up trump"),
    }
}

fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return String::from("(empty)");
    }
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
