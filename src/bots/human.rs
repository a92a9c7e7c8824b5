use std::io::{self, BufRead, Write};

use crate::action::Move;
use crate::bot::Bot;
use crate::state::PlayerPerspective;
use crate::visualize::{describe_move, render_perspective};

/// Interactive bot reading moves from standard input.
///
/// A move is picked by its listed index or, for a plain card, by its label
/// such as `10H` or `qs`. `m` declares the only available marriage, `x` takes
/// the trump exchange.
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

/// Resolves one line of input against the legal moves.
fn parse_choice(input: &str, moves: &[Move]) -> Option<Move> {
    if let Ok(index) = input.parse::<usize>() {
        return moves.get(index).copied();
    }
    let wanted = input.to_ascii_uppercase();
    let mut specials = moves.iter().filter(|mv| match wanted.as_str() {
        "M" => matches!(mv, Move::Marriage { .. }),
        "X" => matches!(mv, Move::TrumpExchange { .. }),
        _ => false,
    });
    if let Some(first) = specials.next() {
        return specials.next().is_none().then_some(*first);
    }
    moves
        .iter()
        .find(|mv| matches!(mv, Move::Regular(card) if card.to_string() == wanted))
        .copied()
}

impl Bot for HumanBot {
    fn select_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        let moves = perspective.valid_moves();
        assert!(!moves.is_empty(), "at least one legal move must exist");
        let stdin = io::stdin();
        loop {
            println!("\n--- {} to move ---", self.name);
            print!("{}", render_perspective(perspective));
            if let Some(lead) = leader_move {
                println!("On the table: {}", describe_move(&lead));
            }
            for (index, candidate) in moves.iter().enumerate() {
                println!("  [{index}] {}", describe_move(candidate));
            }
            print!("Move (index, card like 10H, m, x, q): ");
            if io::stdout().flush().is_err() {
                eprintln!("failed to flush stdout");
            }
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => {
                    println!("\nInput closed, leaving the game.");
                    std::process::exit(0);
                }
                Ok(_) => {}
                Err(err) => {
                    eprintln!("failed to read input: {err}");
                    continue;
                }
            }
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") {
                println!("Leaving the game.");
                std::process::exit(0);
            }
            match parse_choice(trimmed, moves) {
                Some(chosen) => return chosen,
                None => println!("'{trimmed}' is not one of the listed moves."),
            }
        }
    }
}
