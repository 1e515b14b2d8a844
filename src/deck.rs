use std::fmt;

use log::{debug, info};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::TableError;

pub const CARDS_PER_DECK: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Clubs => '♣',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Base blackjack value. Faces count 10 and an ace counts 11 until
    /// scoring demotes it.
    pub fn value(&self) -> u32 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    pub fn is_ace(&self) -> bool {
        matches!(self, Rank::Ace)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn value(&self) -> u32 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// One or more decks shuffled together. The top of the shoe is the end of
/// `cards`.
pub struct Shoe {
    pub num_decks: u8,
    cards: Vec<Card>,
    rng: SmallRng,
}

impl Shoe {
    pub fn new(num_decks: u8, seed: u64) -> Self {
        let mut shoe = Shoe {
            num_decks,
            cards: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        };
        shoe.rebuild();
        shoe
    }

    /// Refills the shoe with `num_decks` complete decks in suit order.
    fn build(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    self.cards.push(Card::new(rank, suit));
                }
            }
        }
    }

    fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    pub fn rebuild(&mut self) {
        self.build();
        self.shuffle();
        info!(
            "shoe rebuilt: {} deck(s), {} cards",
            self.num_decks,
            self.cards.len()
        );
    }

    pub fn draw(&mut self) -> Result<Card, TableError> {
        let card = self.cards.pop().ok_or(TableError::EmptyShoe)?;
        debug!("drew {card}, {} left in shoe", self.cards.len());
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn full_size(&self) -> usize {
        self.num_decks as usize * CARDS_PER_DECK
    }

    /// Moves `top` to the top of the shoe so that `top[0]` is drawn first.
    /// Each card is taken out of the cards not yet stacked, so the shoe keeps
    /// its composition. Leaves the shoe untouched on error.
    pub fn stack_top(&mut self, top: &[Card]) -> Result<(), TableError> {
        let mut cards = self.cards.clone();
        for (stacked, card) in top.iter().rev().enumerate() {
            let loose = cards.len() - stacked;
            let pos = cards[..loose]
                .iter()
                .position(|c| c == card)
                .ok_or(TableError::CardNotInShoe(*card))?;
            let card = cards.remove(pos);
            cards.push(card);
        }
        self.cards = cards;
        Ok(())
    }
}
