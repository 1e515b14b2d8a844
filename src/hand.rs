use serde::Serialize;

use crate::deck::{Card, Shoe};
use crate::error::TableError;

pub const BLACKJACK: u32 = 21;

/// Best total for `cards`: every ace counts 11 until that busts the hand,
/// then aces drop to 1 one at a time.
pub fn hand_value(cards: &[Card]) -> (u32, bool) {
    let mut total = 0;
    let mut aces = 0;

    for card in cards {
        total += card.value();
        if card.rank.is_ace() {
            aces += 1;
        }
    }

    while total > BLACKJACK && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces > 0)
}

pub fn score(cards: &[Card]) -> u32 {
    hand_value(cards).0
}

/// True while an ace is still counted as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    hand_value(cards).1
}

pub fn is_bust(cards: &[Card]) -> bool {
    score(cards) > BLACKJACK
}

pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && score(cards) == BLACKJACK
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn score(&self) -> u32 {
        score(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_bust(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand { cards }
    }
}

/// Anyone holding a hand at the table.
pub trait Seat {
    fn hand(&self) -> &Hand;
    fn hand_mut(&mut self) -> &mut Hand;

    fn draw(&mut self, shoe: &mut Shoe) -> Result<Card, TableError> {
        let card = shoe.draw()?;
        self.hand_mut().add_card(card);
        Ok(card)
    }

    fn reset(&mut self) {
        self.hand_mut().clear();
    }

    fn score(&self) -> u32 {
        self.hand().score()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChipLedger {
    balance: i64,
}

impl ChipLedger {
    pub fn new(balance: i64) -> Self {
        ChipLedger { balance }
    }

    pub fn add(&mut self, chips: i64) {
        self.balance += chips;
    }

    pub fn lose(&mut self, chips: i64) {
        self.balance -= chips;
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }
}

#[derive(Clone, Debug, Default)]
pub struct Player {
    hand: Hand,
    pub chips: ChipLedger,
}

impl Player {
    pub fn new(starting_chips: i64) -> Self {
        Player {
            hand: Hand::new(),
            chips: ChipLedger::new(starting_chips),
        }
    }
}

impl Seat for Player {
    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}

/// The house. Its first card is the hole card; the second is the up card.
#[derive(Clone, Debug, Default)]
pub struct Dealer {
    hand: Hand,
}

impl Dealer {
    pub fn new() -> Self {
        Dealer { hand: Hand::new() }
    }

    pub fn hole_card(&self) -> Option<Card> {
        self.hand.cards().first().copied()
    }

    pub fn up_card(&self) -> Option<Card> {
        self.hand.cards().get(1).copied()
    }
}

impl Seat for Dealer {
    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}
