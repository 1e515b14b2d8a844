use serde::Serialize;

use crate::deck::Card;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    Hit,
    Stand,
    DoubleDown,
}

impl Action {
    pub fn as_code(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::DoubleDown => "D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub action: Action,
    pub rationale: &'static str,
}

impl Suggestion {
    const fn new(action: Action, rationale: &'static str) -> Self {
        Suggestion { action, rationale }
    }
}

/// Value the table is read with: faces are 10, an ace is 11.
pub fn dealer_up_value(card: &Card) -> u32 {
    card.value()
}

/// Basic strategy over hard totals. Soft totals are looked up as if hard.
pub fn suggest(player_total: u32, dealer_up: u32) -> Suggestion {
    match player_total {
        17..=u32::MAX => Suggestion::new(
            Action::Stand,
            "17 or more is strong enough; any card risks a bust",
        ),
        13..=16 if dealer_up < 7 => Suggestion::new(
            Action::Stand,
            "dealer shows a weak card and is likely to bust, so stand on 13-16",
        ),
        13..=16 => Suggestion::new(
            Action::Hit,
            "dealer shows 7 or better, 13-16 will usually lose if you stand",
        ),
        12 if (4..=6).contains(&dealer_up) => Suggestion::new(
            Action::Stand,
            "dealer shows 4-6 and busts often, so stand on 12",
        ),
        12 => Suggestion::new(
            Action::Hit,
            "only a ten-value card busts 12, hit against this dealer card",
        ),
        11 if dealer_up < 11 => Suggestion::new(
            Action::DoubleDown,
            "11 is the best doubling total against anything but an ace",
        ),
        11 => Suggestion::new(
            Action::Hit,
            "dealer shows an ace, hit 11 instead of doubling",
        ),
        10 if dealer_up < 10 => Suggestion::new(
            Action::DoubleDown,
            "10 beats a dealer showing 9 or less often enough to double",
        ),
        10 => Suggestion::new(
            Action::Hit,
            "dealer shows a ten or an ace, hit 10 instead of doubling",
        ),
        9 if (3..=6).contains(&dealer_up) => Suggestion::new(
            Action::DoubleDown,
            "dealer shows 3-6, double down on 9",
        ),
        9 => Suggestion::new(Action::Hit, "9 is too weak to double against this dealer card"),
        _ => Suggestion::new(Action::Hit, "8 or less cannot bust, always hit"),
    }
}
