use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use plotters::prelude::*;

use schnapsbot::logging::init_tracing;
use schnapsbot::{Bot, Game, GameError, GameStatus, StrategyParams};
use schnapsbot::{create_bot_from_spec, label_for_spec};

const DEFAULT_SEED: u64 = 0x5C4A_9500_0000_0066;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Play seat-swapped Schnapsen matches and report wins by game points."
)]
struct Args {
    /// Number of deals; each deal is played twice with swapped seats
    #[arg(short = 'g', long = "games", default_value_t = 100)]
    deals: usize,

    /// Base seed; deck and bot seeds are derived from it
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// PNG file for the stacked win chart
    #[arg(short = 'o', long = "out", default_value = "winrates.png")]
    out: PathBuf,

    /// Print the table only
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// JSON file overriding strategy parameters
    #[arg(long = "params")]
    params: Option<PathBuf>,

    /// Log strategy decisions (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Two bot specs, e.g. `strategy random`
    bots: Vec<String>,
}

/// Results gathered for one bot label.
#[derive(Debug, Default)]
struct Tally {
    games: usize,
    /// Wins indexed by game points minus one.
    wins_by_points: [usize; 3],
    decisions: usize,
    thinking: Duration,
}

impl Tally {
    fn wins(&self) -> usize {
        self.wins_by_points.iter().sum()
    }

    fn game_points(&self) -> usize {
        self.wins_by_points
            .iter()
            .enumerate()
            .map(|(idx, wins)| (idx + 1) * wins)
            .sum()
    }

    fn share(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }
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
    let [first, second] = args.bots.as_slice() else {
        return Err(format!(
            "expected exactly 2 bot specs (e.g. strategy random), received {}",
            args.bots.len()
        )
        .into());
    };
    if args.bots.iter().any(|spec| label_for_spec(spec) == "human") {
        return Err("human players would block a batch run".into());
    }
    let params = match &args.params {
        Some(path) => StrategyParams::from_json_file(path)?,
        None => StrategyParams::default(),
    };

    let specs = [first.as_str(), second.as_str()];
    let labels = specs.map(label_for_spec);
    // Identical labels share one tally.
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for deal in 0..args.deals {
        let deck_seed = mix_seed(args.seed, deal as u64, 0);
        for swapped in [false, true] {
            let seats = if swapped { [1, 0] } else { [0, 1] };
            let mut game = Game::builder().with_seed(deck_seed).build()?;
            let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(2);
            for (seat, &source) in seats.iter().enumerate() {
                let bot_seed =
                    mix_seed(args.seed, deal as u64, 1 + seat as u64 + 2 * u64::from(swapped));
                bots.push(create_bot_from_spec(specs[source], seat, bot_seed, &params)?);
            }

            let mut seat_tallies = [Tally::default(), Tally::default()];
            let [left, right] = &mut seat_tallies;
            let (winner, game_points) = play_timed(&mut game, &mut bots, [left, right])?;
            seat_tallies[winner].wins_by_points[game_points as usize - 1] += 1;
            for (seat, played) in seat_tallies.into_iter().enumerate() {
                let tally = tallies.entry(labels[seats[seat]].clone()).or_default();
                tally.games += 1;
                tally.decisions += played.decisions;
                tally.thinking += played.thinking;
                for (total, wins) in tally.wins_by_points.iter_mut().zip(played.wins_by_points) {
                    *total += wins;
                }
            }
        }
    }

    println!(
        "{:<12}  {:>9}  {:>7}  {:>5}  {:>5}  {:>5}  {:>9}  {:>10}",
        "bot", "wins", "rate", "1pt", "2pt", "3pt", "game pts", "avg ms"
    );
    for (label, tally) in &tallies {
        let avg_ms = if tally.decisions == 0 {
            0.0
        } else {
            tally.thinking.as_secs_f64() * 1.0e3 / tally.decisions as f64
        };
        println!(
            "{label:<12}  {:>4}/{:<4}  {:>6.2}%  {:>5}  {:>5}  {:>5}  {:>9}  {avg_ms:>10.4}",
            tally.wins(),
            tally.games,
            tally.share(tally.wins()) * 100.0,
            tally.wins_by_points[0],
            tally.wins_by_points[1],
            tally.wins_by_points[2],
            tally.game_points(),
        );
    }

    if !args.no_chart {
        if !args
            .out
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        {
            return Err("only PNG charts are supported; use --out with .png".into());
        }
        render_chart(&args.out, &tallies)?;
        println!("\nChart written to {}", args.out.display());
    }
    Ok(())
}

/// Plays one game to the end, timing every decision into the seat's tally.
fn play_timed(
    game: &mut Game,
    bots: &mut [Box<dyn Bot>],
    mut tallies: [&mut Tally; 2],
) -> Result<(usize, u32), GameError> {
    while !game.is_finished() {
        let current = game.current_player();
        let perspective = game.perspective(current)?;
        let started = Instant::now();
        let chosen = bots[current].select_move(&perspective, game.leader_move());
        tallies[current].thinking += started.elapsed();
        tallies[current].decisions += 1;
        game.apply_move(current, chosen)?;
    }
    match game.status() {
        GameStatus::Finished {
            winner,
            game_points,
        } => Ok((winner, game_points)),
        GameStatus::Ongoing => Err(GameError::InvalidConfiguration("game loop ended early")),
    }
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    // splitmix64 finalizer over the combined inputs
    let mut z = base
        .wrapping_add(a.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(b.wrapping_mul(0xD1B5_4A32_D192_ED03));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stacked bars per bot: share of games won with 1, 2 and 3 game points.
fn render_chart(out: &Path, tallies: &BTreeMap<String, Tally>) -> Result<(), Box<dyn Error>> {
    let labels: Vec<&String> = tallies.keys().collect();
    let root = BitMapBackend::new(out, (900, 560)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Schnapsen wins by game points", ("sans-serif", 26).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0..labels.len(), 0.0f64..100.0)
        .map_err(|e| format!("{e}"))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Share of games (%)")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).map(|l| l.to_string()).unwrap_or_default())
        .draw()
        .map_err(|e| format!("{e}"))?;

    let colors = [BLUE.mix(0.45), BLUE.mix(0.7), BLUE.mix(1.0)];
    for (idx, tally) in tallies.values().enumerate() {
        let mut floor = 0.0;
        for (points, color) in colors.iter().enumerate() {
            let top = floor + tally.share(tally.wins_by_points[points]) * 100.0;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(idx, floor), (idx + 1, top)],
                    color.filled(),
                )))
                .map_err(|e| format!("{e}"))?;
            floor = top;
        }
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
