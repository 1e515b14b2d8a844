use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use blackjack_count::{
    sim::{self, SimulationInput},
    HoleCardTiming,
};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(
    name = "blackjack-sim",
    about = "Play blackjack rounds by basic strategy while keeping a Hi-Lo count"
)]
struct Args {
    /// JSON file with simulation input; flags given on the command line override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of decks in the shoe
    #[arg(long)]
    decks: Option<u8>,

    /// Rounds to play
    #[arg(long)]
    rounds: Option<u32>,

    /// Seed for the shoe shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Rebuild the shoe before a round when fewer cards than this remain
    #[arg(long)]
    reshuffle_threshold: Option<usize>,

    /// Chips won or lost per round
    #[arg(long)]
    stake: Option<i64>,

    /// Chips the player sits down with
    #[arg(long)]
    starting_chips: Option<i64>,

    /// Count the dealer's hole card as soon as it is dealt
    #[arg(long, default_value_t = false)]
    eager_hole_card: bool,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn load_input(args: &Args) -> anyhow::Result<SimulationInput> {
    let mut input: SimulationInput = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => serde_json::from_str("{}")?,
    };

    if let Some(decks) = args.decks {
        input.table.num_decks = decks;
    }
    if let Some(rounds) = args.rounds {
        input.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        input.table.seed = seed;
    }
    if let Some(threshold) = args.reshuffle_threshold {
        input.table.reshuffle_threshold = threshold;
    }
    if let Some(stake) = args.stake {
        input.table.stake = stake;
    }
    if let Some(chips) = args.starting_chips {
        input.table.starting_chips = chips;
    }
    if args.eager_hole_card {
        input.table.hole_card_timing = HoleCardTiming::Eager;
    }
    Ok(input)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let input = load_input(&args)?;

    let result = sim::run_with_progress(input, |done, total| {
        info!("[SIM] {done}/{total} rounds");
    })?;

    let report = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{report}");
    Ok(())
}
