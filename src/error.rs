use thiserror::Error;

use crate::deck::Card;
use crate::game::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("shoe is empty")]
    EmptyShoe,
    #[error("cannot {action} while the round is in the {phase:?} phase")]
    InvalidAction { action: &'static str, phase: Phase },
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("card {0} is not left in the shoe")]
    CardNotInShoe(Card),
}
