use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    counter::{CardCounter, HoleCardTiming},
    deck::{Card, Shoe},
    error::TableError,
    hand::{Dealer, Player, Seat, BLACKJACK},
    strategy::{self, Suggestion},
};

pub const DEALER_STANDS_ON: u32 = 17;

fn default_num_decks() -> u8 {
    6
}

fn default_reshuffle_threshold() -> usize {
    10
}

fn default_stake() -> i64 {
    100
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    /// A new round rebuilds the shoe when fewer cards than this are left.
    #[serde(default = "default_reshuffle_threshold")]
    pub reshuffle_threshold: usize,
    #[serde(default)]
    pub seed: u64,
    /// Chips won or lost on every settled round.
    #[serde(default = "default_stake")]
    pub stake: i64,
    #[serde(default)]
    pub starting_chips: i64,
    #[serde(default)]
    pub hole_card_timing: HoleCardTiming,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            num_decks: default_num_decks(),
            reshuffle_threshold: default_reshuffle_threshold(),
            seed: 0,
            stake: default_stake(),
            starting_chips: 0,
            hole_card_timing: HoleCardTiming::default(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        if self.num_decks == 0 {
            return Err(TableError::InvalidConfig(
                "num_decks must be at least 1".to_string(),
            ));
        }
        if self.stake < 0 {
            return Err(TableError::InvalidConfig(format!(
                "stake {} must not be negative",
                self.stake
            )));
        }
        let shoe_size = self.num_decks as usize * crate::deck::CARDS_PER_DECK;
        if self.reshuffle_threshold > shoe_size {
            return Err(TableError::InvalidConfig(format!(
                "reshuffle_threshold {} is larger than a full shoe of {shoe_size} cards",
                self.reshuffle_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    PlayerWins,
    DealerWins,
    Push,
    PlayerBust,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub player_hand: Vec<Card>,
    pub player_score: u32,
    pub dealer_up_card: Card,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitView {
    pub player_hand: Vec<Card>,
    pub score: u32,
    pub bust: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub dealer_hand: Vec<Card>,
    pub dealer_score: u32,
    pub player_hand: Vec<Card>,
    pub player_score: u32,
    pub outcome: Outcome,
    pub chips_delta: i64,
    pub chips: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountView {
    pub running: i32,
    pub true_count: f64,
}

#[derive(Clone, Copy)]
enum SeatId {
    Player,
    Dealer,
}

/// One player against the dealer. Owns the shoe, both hands and the count
/// for the whole session.
pub struct Table {
    config: TableConfig,
    shoe: Shoe,
    counter: CardCounter,
    player: Player,
    dealer: Dealer,
    phase: Phase,
    hole_counted: bool,
    reshuffles: u32,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let shoe = Shoe::new(config.num_decks, config.seed);
        let player = Player::new(config.starting_chips);
        Ok(Table {
            config,
            shoe,
            counter: CardCounter::new(),
            player,
            dealer: Dealer::new(),
            phase: Phase::Betting,
            hole_counted: false,
            reshuffles: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chips(&self) -> i64 {
        self.player.chips.balance()
    }

    pub fn shoe_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn player_cards(&self) -> &[Card] {
        self.player.hand().cards()
    }

    /// Puts `cards` on top of the shoe, first card dealt first. Only allowed
    /// between rounds. A reshuffle at the next deal discards the order.
    pub fn stack_shoe(&mut self, cards: &[Card]) -> Result<(), TableError> {
        self.require_between_rounds("stack the shoe")?;
        self.shoe.stack_top(cards)
    }

    pub fn new_round(&mut self) -> Result<RoundView, TableError> {
        self.require_between_rounds("deal a new round")?;
        self.reshuffle_if_due()?;

        self.player.reset();
        self.dealer.reset();
        self.phase = Phase::Dealing;

        let eager = self.config.hole_card_timing == HoleCardTiming::Eager;
        self.deal_card(SeatId::Player, true)?;
        self.deal_card(SeatId::Player, true)?;
        self.deal_card(SeatId::Dealer, eager)?;
        self.hole_counted = eager;
        let dealer_up_card = self.deal_card(SeatId::Dealer, true)?;

        self.phase = Phase::PlayerTurn;
        Ok(RoundView {
            player_hand: self.player.hand().cards().to_vec(),
            player_score: self.player.score(),
            dealer_up_card,
        })
    }

    pub fn hit(&mut self) -> Result<HitView, TableError> {
        self.require_phase(Phase::PlayerTurn, "hit")?;
        if self.player.score() >= BLACKJACK {
            return Err(self.invalid("hit"));
        }

        self.deal_card(SeatId::Player, true)?;
        let score = self.player.score();
        let bust = score > BLACKJACK;
        let settlement = if bust { Some(self.settle()) } else { None };

        Ok(HitView {
            player_hand: self.player.hand().cards().to_vec(),
            score,
            bust,
            settlement,
        })
    }

    pub fn stand(&mut self) -> Result<Settlement, TableError> {
        self.require_phase(Phase::PlayerTurn, "stand")?;
        self.phase = Phase::DealerTurn;
        self.play_dealer()?;
        Ok(self.settle())
    }

    pub fn current_count(&self) -> CountView {
        CountView {
            running: self.counter.running(),
            true_count: self.counter.true_count(self.shoe.remaining()),
        }
    }

    /// True count rounded to a whole bucket.
    pub fn count_range(&self) -> i32 {
        self.counter.count_range(self.shoe.remaining())
    }

    /// Rebuilds the shoe and resets the count when fewer cards than the
    /// threshold are left. Only allowed between rounds; `new_round` runs it
    /// before every deal.
    pub fn reshuffle_if_due(&mut self) -> Result<bool, TableError> {
        self.require_between_rounds("reshuffle")?;
        if self.shoe.remaining() >= self.config.reshuffle_threshold {
            return Ok(false);
        }
        info!(
            "{} cards left, below threshold of {}",
            self.shoe.remaining(),
            self.config.reshuffle_threshold
        );
        self.reshuffle();
        Ok(true)
    }

    pub fn suggest_move(&self) -> Result<Suggestion, TableError> {
        self.require_phase(Phase::PlayerTurn, "suggest a move")?;
        let up_card = self
            .dealer
            .up_card()
            .ok_or_else(|| self.invalid("suggest a move"))?;
        Ok(strategy::suggest(
            self.player.score(),
            strategy::dealer_up_value(&up_card),
        ))
    }

    /// Abandons the round in progress with no chips changing hands.
    /// Cards already seen stay counted and out of the shoe.
    pub fn abort_round(&mut self) -> Result<(), TableError> {
        self.require_phase(Phase::PlayerTurn, "abort the round")?;
        info!("round aborted");
        self.clear_round();
        Ok(())
    }

    fn play_dealer(&mut self) -> Result<(), TableError> {
        self.reveal_hole_card();
        while self.dealer.score() < DEALER_STANDS_ON {
            self.deal_card(SeatId::Dealer, true)?;
        }
        Ok(())
    }

    fn reveal_hole_card(&mut self) {
        if self.hole_counted {
            return;
        }
        if let Some(hole) = self.dealer.hole_card() {
            self.counter.record(&hole);
            self.hole_counted = true;
        }
    }

    fn settle(&mut self) -> Settlement {
        self.reveal_hole_card();

        let player_score = self.player.score();
        let dealer_score = self.dealer.score();
        let outcome = if player_score > BLACKJACK {
            Outcome::PlayerBust
        } else if dealer_score > BLACKJACK || player_score > dealer_score {
            Outcome::PlayerWins
        } else if player_score < dealer_score {
            Outcome::DealerWins
        } else {
            Outcome::Push
        };

        let stake = self.config.stake;
        let chips_delta = match outcome {
            Outcome::PlayerWins => {
                self.player.chips.add(stake);
                stake
            }
            Outcome::DealerWins | Outcome::PlayerBust => {
                self.player.chips.lose(stake);
                -stake
            }
            Outcome::Push => 0,
        };
        self.phase = Phase::Settled;

        info!(
            "round settled: player {player_score}, dealer {dealer_score}, {outcome:?}, chips {chips_delta:+} -> {}",
            self.chips()
        );

        Settlement {
            dealer_hand: self.dealer.hand().cards().to_vec(),
            dealer_score,
            player_hand: self.player.hand().cards().to_vec(),
            player_score,
            outcome,
            chips_delta,
            chips: self.chips(),
        }
    }

    fn deal_card(&mut self, seat: SeatId, counted: bool) -> Result<Card, TableError> {
        let drawn = match seat {
            SeatId::Player => self.player.draw(&mut self.shoe),
            SeatId::Dealer => self.dealer.draw(&mut self.shoe),
        };
        let card = match drawn {
            Ok(card) => card,
            Err(err) => {
                warn!("{err} mid-round, rebuilding shoe and abandoning the round");
                self.reshuffle();
                self.clear_round();
                return Err(err);
            }
        };
        if counted {
            self.counter.record(&card);
        }
        Ok(card)
    }

    fn reshuffle(&mut self) {
        self.shoe.rebuild();
        self.counter.reset();
        self.reshuffles += 1;
    }

    fn clear_round(&mut self) {
        self.player.reset();
        self.dealer.reset();
        self.hole_counted = false;
        self.phase = Phase::Betting;
    }

    fn require_phase(&self, phase: Phase, action: &'static str) -> Result<(), TableError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn require_between_rounds(&self, action: &'static str) -> Result<(), TableError> {
        match self.phase {
            Phase::Betting | Phase::Settled => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> TableError {
        TableError::InvalidAction {
            action,
            phase: self.phase,
        }
    }
}
