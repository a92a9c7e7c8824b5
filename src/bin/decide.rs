use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use schnapsbot::logging::init_tracing;
use schnapsbot::{Bot, Move, PlayerPerspective, StrategyBot, StrategyParams};

/// One turn handed to the bot.
#[derive(Debug, Deserialize)]
struct Turn {
    perspective: PlayerPerspective,
    #[serde(default)]
    leader_move: Option<Move>,
}

#[derive(Debug, Serialize)]
struct Decision {
    turn: usize,
    chosen: Move,
}

#[derive(Parser, Debug)]
#[command(
    name = "decide",
    about = "Replay a JSON list of turns through one strategy bot and print its moves."
)]
struct Args {
    /// JSON file holding an array of { "perspective": ..., "leader_move": ... }
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Seed of the bot's random source
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,

    /// JSON file overriding strategy parameters
    #[arg(long = "params")]
    params: Option<PathBuf>,

    /// Log strategy decisions (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    init_tracing(args.verbose);
    let params = match &args.params {
        Some(path) => StrategyParams::from_json_file(path)?,
        None => StrategyParams::default(),
    };
    let raw = fs::read_to_string(&args.input)?;
    let turns: Vec<Turn> = serde_json::from_str(&raw)?;

    let mut bot = StrategyBot::with_params(args.seed, params);
    for (index, turn) in turns.into_iter().enumerate() {
        if turn.perspective.valid_moves().is_empty() {
            return Err(format!("turn {index} has no valid moves").into());
        }
        let chosen = bot.select_move(&turn.perspective, turn.leader_move);
        let decision = Decision {
            turn: index,
            chosen,
        };
        println!("{}", serde_json::to_string(&decision)?);
    }
    Ok(())
}
