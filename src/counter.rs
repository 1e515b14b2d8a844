use log::debug;
use serde::{Deserialize, Serialize};

use crate::deck::{Card, Rank, CARDS_PER_DECK};

/// When the dealer's hole card enters the count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoleCardTiming {
    /// Counted once it is turned over, as a player at the table would.
    #[default]
    OnReveal,
    /// Counted as soon as it is dealt.
    Eager,
}

pub fn hi_lo_value(card: &Card) -> i32 {
    match card.rank {
        Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
        Rank::Seven | Rank::Eight | Rank::Nine => 0,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
    }
}

pub fn update(cards: &[Card], running_count: i32) -> i32 {
    cards
        .iter()
        .fold(running_count, |count, card| count + hi_lo_value(card))
}

/// Running count per deck left, with fewer than one deck treated as one.
pub fn true_count(running_count: i32, remaining_cards: usize) -> f64 {
    let remaining_decks = remaining_cards as f64 / CARDS_PER_DECK as f64;
    if remaining_decks < 1.0 {
        debug!("{remaining_cards} cards left, true count divides by one deck");
    }
    running_count as f64 / remaining_decks.max(1.0)
}

#[derive(Clone, Debug, Default)]
pub struct CardCounter {
    running_count: i32,
}

impl CardCounter {
    pub fn new() -> Self {
        CardCounter { running_count: 0 }
    }

    pub fn record(&mut self, card: &Card) {
        self.running_count += hi_lo_value(card);
        debug!("counted {card}, running count {}", self.running_count);
    }

    pub fn reset(&mut self) {
        self.running_count = 0;
    }

    pub fn running(&self) -> i32 {
        self.running_count
    }

    pub fn true_count(&self, remaining_cards: usize) -> f64 {
        true_count(self.running_count, remaining_cards)
    }

    /// True count rounded to the nearest whole bucket.
    pub fn count_range(&self, remaining_cards: usize) -> i32 {
        self.true_count(remaining_cards).round() as i32
    }
}
