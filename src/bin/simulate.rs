use std::env;
use std::error::Error;
use std::process;

use schnapsbot::logging::init_tracing;
use schnapsbot::{
    Bot, Game, GameStatus, StrategyParams, create_bot_from_spec, describe_move, render_perspective,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut visualize = false;
    let mut verbose = false;
    let mut seed = DEFAULT_SEED;
    let mut params = StrategyParams::default();
    let mut bot_specs: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--visualize" => visualize = true,
            "--verbose" => verbose = true,
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--params" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--params requires a file path".to_string())?;
                params = StrategyParams::from_json_file(&path)?;
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => bot_specs.push(other.to_string()),
        }
    }
    init_tracing(verbose);

    if bot_specs.is_empty() {
        bot_specs = vec![String::from("strategy"), String::from("random")];
    }
    if bot_specs.len() != 2 {
        return Err(format!("expected 2 players, received {}", bot_specs.len()).into());
    }

    let mut game = Game::builder().with_seed(seed).build()?;
    let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(2);
    for (index, spec) in bot_specs.iter().enumerate() {
        bots.push(create_bot_from_spec(spec, index, seed, &params)?);
    }

    println!(
        "Starting Schnapsen: {} vs {} (trump {}).\n",
        bot_specs[0],
        bot_specs[1],
        game.trump_suit()
    );
    let mut moves = 0usize;
    while !game.is_finished() {
        let current = game.current_player();
        let perspective = game.perspective(current)?;
        if visualize {
            println!("--- Player {current} ---");
            println!("{}", render_perspective(&perspective));
        }
        let chosen = bots[current].select_move(&perspective, game.leader_move());
        if visualize {
            println!("Chosen move: {}\n", describe_move(&chosen));
        }
        let completes_trick = game.leader_move().is_some();
        game.apply_move(current, chosen)?;
        if visualize && completes_trick {
            if let Some(trick) = game.last_trick() {
                println!("Trick won by player {}.\n", trick.winner);
            }
        }
        moves += 1;
    }

    match game.status() {
        GameStatus::Finished {
            winner,
            game_points,
        } => {
            let loser = 1 - winner;
            println!(
                "Game finished after {moves} moves. Winner: Player {winner} ({}) with {} points against {}, {game_points} game point(s).",
                bot_specs[winner],
                game.score(winner)?.direct,
                game.score(loser)?.direct
            );
        }
        GameStatus::Ongoing => println!("Simulation stopped before completion."),
    }

    Ok(())
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [BOT BOT]");
    println!("  --visualize           Show each perspective and the chosen moves");
    println!("  --verbose             Log strategy decisions (RUST_LOG overrides)");
    println!("  --seed <u64>          Seed for shuffling (default: {DEFAULT_SEED:#x})");
    println!("  --params <file>       JSON file overriding strategy parameters");
    println!("  --help                Show this help message");
    println!("Bots: strategy[:seed], random[:seed], human[:name] (default: strategy random)");
}
