use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::TableError,
    game::{Outcome, RoundView, Settlement, Table, TableConfig},
    hand::is_blackjack,
    strategy::{dealer_up_value, Action},
};

fn default_rounds() -> u32 {
    1_000
}

fn default_progress_interval() -> u32 {
    10_000
}

#[derive(Clone, Debug, Deserialize)]
pub struct SimulationInput {
    #[serde(flatten)]
    pub table: TableConfig,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub player_busts: u32,
    pub dealer_busts: u32,
    pub blackjacks: u32,
    pub aborted_rounds: u32,
    pub reshuffles: u32,
    pub net_chips: i64,
    pub final_chips: i64,
    pub expected_value: f64,
    pub win_rate: f64,
    pub count_stats: CountStats,
    pub cell_stats: HashMap<String, CellStats>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountStats {
    pub total_rounds: u32,
    pub count_distribution: HashMap<String, u32>,
    pub ev_by_count: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStats {
    pub player_total: u32,
    pub dealer_card: u32,
    pub action: String,
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub net_chips: i64,
}

/// A round played out by following the suggested move at every decision.
#[derive(Debug, Clone)]
pub struct PlayedRound {
    pub opening: RoundView,
    pub first_action: Action,
    pub settlement: Settlement,
}

/// Deals a round and plays it by the table's suggestions. A double down
/// takes exactly one card and stands; the stake is not doubled.
pub fn play_round(table: &mut Table) -> Result<PlayedRound, TableError> {
    let opening = table.new_round()?;
    let first_action = table.suggest_move()?.action;
    let mut action = first_action;

    let settlement = loop {
        match action {
            Action::Stand => break table.stand()?,
            Action::Hit => {
                if let Some(settlement) = table.hit()?.settlement {
                    break settlement;
                }
            }
            Action::DoubleDown => {
                break match table.hit()?.settlement {
                    Some(settlement) => settlement,
                    None => table.stand()?,
                };
            }
        }
        action = table.suggest_move()?.action;
    };

    Ok(PlayedRound {
        opening,
        first_action,
        settlement,
    })
}

pub fn run(input: SimulationInput) -> Result<SimulationResult, TableError> {
    run_with_progress(input, |_current, _total| {})
}

pub fn run_with_progress<F>(
    input: SimulationInput,
    mut progress_cb: F,
) -> Result<SimulationResult, TableError>
where
    F: FnMut(u32, u32),
{
    let mut table = Table::new(input.table.clone())?;
    let starting_chips = table.chips();
    let progress_interval = input.progress_interval.max(1);

    let mut wins = 0;
    let mut losses = 0;
    let mut pushes = 0;
    let mut player_busts = 0;
    let mut dealer_busts = 0;
    let mut blackjacks = 0;
    let mut aborted_rounds = 0;
    let mut count_stats = CountStats::default();
    let mut cell_stats: HashMap<String, CellStats> = HashMap::new();

    info!(
        "simulating {} rounds with {} deck(s), seed {}",
        input.rounds, input.table.num_decks, input.table.seed
    );

    for round_index in 0..input.rounds {
        let count_bucket = pre_deal_bucket(&mut table)?;

        match play_round(&mut table) {
            Ok(round) => {
                let settlement = &round.settlement;
                match settlement.outcome {
                    Outcome::PlayerWins => wins += 1,
                    Outcome::DealerWins => losses += 1,
                    Outcome::PlayerBust => {
                        losses += 1;
                        player_busts += 1;
                    }
                    Outcome::Push => pushes += 1,
                }
                if settlement.outcome != Outcome::PlayerBust && settlement.dealer_score > 21 {
                    dealer_busts += 1;
                }
                if is_blackjack(&settlement.player_hand) {
                    blackjacks += 1;
                }
                update_count_stats(&mut count_stats, count_bucket, settlement.chips_delta);
                track_cell_stats(&round, &mut cell_stats);
            }
            Err(TableError::EmptyShoe) => {
                warn!("round {} abandoned on an empty shoe", round_index + 1);
                aborted_rounds += 1;
            }
            Err(err) => return Err(err),
        }

        let completed = round_index + 1;
        if completed % progress_interval == 0 || completed == input.rounds {
            progress_cb(completed, input.rounds);
        }
    }

    finalize_count_stats(&mut count_stats);

    let total_rounds = input.rounds;
    let played = total_rounds - aborted_rounds;
    let net_chips = table.chips() - starting_chips;
    let expected_value = if played > 0 {
        net_chips as f64 / played as f64
    } else {
        0.0
    };
    let win_rate = if played > 0 {
        (wins as f64 / played as f64) * 100.0
    } else {
        0.0
    };

    Ok(SimulationResult {
        total_rounds,
        wins,
        losses,
        pushes,
        player_busts,
        dealer_busts,
        blackjacks,
        aborted_rounds,
        reshuffles: table.reshuffles(),
        net_chips,
        final_chips: table.chips(),
        expected_value,
        win_rate,
        count_stats,
        cell_stats,
    })
}

/// True-count bucket the next round is dealt under, taken after any
/// reshuffle the deal would trigger.
pub fn pre_deal_bucket(table: &mut Table) -> Result<i32, TableError> {
    table.reshuffle_if_due()?;
    Ok(table.count_range())
}

fn update_count_stats(stats: &mut CountStats, count_bucket: i32, chips_delta: i64) {
    let key = count_bucket.to_string();
    *stats.count_distribution.entry(key.clone()).or_default() += 1;
    *stats.ev_by_count.entry(key).or_default() += chips_delta as f64;
    stats.total_rounds += 1;
}

fn finalize_count_stats(stats: &mut CountStats) {
    for (key, rounds) in &stats.count_distribution {
        if *rounds > 0 {
            if let Some(sum) = stats.ev_by_count.get_mut(key) {
                *sum /= *rounds as f64;
            }
        }
    }
}

fn track_cell_stats(round: &PlayedRound, cell_stats: &mut HashMap<String, CellStats>) {
    let player_total = round.opening.player_score;
    let dealer_card = dealer_up_value(&round.opening.dealer_up_card);
    let action_code = round.first_action.as_code();
    let key = format!("{player_total}_{dealer_card}_{action_code}");

    let entry = cell_stats.entry(key).or_insert(CellStats {
        player_total,
        dealer_card,
        action: action_code.to_string(),
        rounds: 0,
        wins: 0,
        losses: 0,
        pushes: 0,
        net_chips: 0,
    });

    entry.rounds += 1;
    entry.net_chips += round.settlement.chips_delta;
    match round.settlement.outcome {
        Outcome::PlayerWins => entry.wins += 1,
        Outcome::DealerWins | Outcome::PlayerBust => entry.losses += 1,
        Outcome::Push => entry.pushes += 1,
    }
}
