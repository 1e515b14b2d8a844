use blackjack_count::{
    counter, Action, Card, HoleCardTiming, Outcome, Phase, Rank, Suit, Table, TableConfig,
    TableError,
};

const STAKE: i64 = 100;

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn table(num_decks: u8, seed: u64) -> Table {
    Table::new(TableConfig {
        num_decks,
        seed,
        stake: STAKE,
        starting_chips: 1_000,
        ..TableConfig::default()
    })
    .unwrap()
}

/// Player gets the first two cards, the dealer's hole card is third and the
/// up card fourth.
fn stacked(top: &[Card]) -> Table {
    let mut table = table(1, 17);
    table.stack_shoe(top).unwrap();
    table
}

#[test]
fn seeded_round_plays_out_by_the_suggestions() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Six, Suit::Diamonds),
        card(Rank::Nine, Suit::Spades),
        card(Rank::Seven, Suit::Hearts),
        card(Rank::Five, Suit::Clubs),
    ]);

    let view = table.new_round().unwrap();
    assert_eq!(view.player_score, 16);
    assert_eq!(view.dealer_up_card, card(Rank::Seven, Suit::Hearts));
    assert_eq!(table.shoe_remaining(), 48);
    // 10 and 6 cancel, the 7 up card is neutral and the 9 is still face down.
    assert_eq!(table.current_count().running, 0);
    assert_eq!(table.suggest_move().unwrap().action, Action::Hit);

    let hit = table.hit().unwrap();
    assert_eq!(hit.score, 21);
    assert!(!hit.bust);
    assert!(hit.settlement.is_none());
    assert_eq!(table.current_count().running, 1);
    assert_eq!(table.suggest_move().unwrap().action, Action::Stand);
    assert!(matches!(
        table.hit(),
        Err(TableError::InvalidAction { action: "hit", .. })
    ));

    let settlement = table.stand().unwrap();
    assert_eq!(settlement.player_score, 21);
    assert_eq!(settlement.dealer_hand[0], card(Rank::Nine, Suit::Spades));
    assert_eq!(settlement.dealer_hand[1], card(Rank::Seven, Suit::Hearts));
    assert!(settlement.dealer_hand.len() >= 3);
    assert!(settlement.dealer_score >= 17);
    let expected = if settlement.dealer_score == 21 {
        Outcome::Push
    } else {
        Outcome::PlayerWins
    };
    assert_eq!(settlement.outcome, expected);
    assert_eq!(settlement.chips, 1_000 + settlement.chips_delta);
    assert_eq!(table.chips(), settlement.chips);

    let mut seen = settlement.player_hand.clone();
    seen.extend(&settlement.dealer_hand);
    assert_eq!(table.current_count().running, counter::update(&seen, 0));

    assert!(table.stand().is_err());
    assert_eq!(table.chips(), settlement.chips);
}

#[test]
fn bust_settles_immediately_and_reveals_hole_card() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Six, Suit::Diamonds),
        card(Rank::Two, Suit::Spades),
        card(Rank::Seven, Suit::Hearts),
        card(Rank::King, Suit::Spades),
    ]);
    table.new_round().unwrap();
    assert_eq!(table.current_count().running, 0);

    let hit = table.hit().unwrap();
    assert!(hit.bust);
    assert_eq!(hit.score, 26);
    let settlement = hit.settlement.unwrap();
    assert_eq!(settlement.outcome, Outcome::PlayerBust);
    assert_eq!(settlement.chips_delta, -STAKE);
    assert_eq!(settlement.dealer_hand.len(), 2);
    assert_eq!(table.phase(), Phase::Settled);
    assert_eq!(table.chips(), 1_000 - STAKE);
    // K counts -1, then the revealed 2 counts +1.
    assert_eq!(table.current_count().running, 0);

    assert!(matches!(
        table.hit(),
        Err(TableError::InvalidAction { phase: Phase::Settled, .. })
    ));
    assert!(table.suggest_move().is_err());
}

#[test]
fn equal_totals_push() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Eight, Suit::Diamonds),
        card(Rank::Queen, Suit::Spades),
        card(Rank::Eight, Suit::Hearts),
    ]);
    table.new_round().unwrap();
    let settlement = table.stand().unwrap();
    assert_eq!(settlement.dealer_score, 18);
    assert_eq!(settlement.outcome, Outcome::Push);
    assert_eq!(settlement.chips_delta, 0);
    assert_eq!(table.chips(), 1_000);
}

#[test]
fn higher_dealer_total_wins() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Seven, Suit::Diamonds),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
    ]);
    table.new_round().unwrap();
    let settlement = table.stand().unwrap();
    assert_eq!(settlement.outcome, Outcome::DealerWins);
    assert_eq!(table.chips(), 1_000 - STAKE);
}

#[test]
fn dealer_bust_pays_player() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Six, Suit::Hearts),
        card(Rank::King, Suit::Hearts),
    ]);
    table.new_round().unwrap();
    let settlement = table.stand().unwrap();
    assert_eq!(settlement.dealer_score, 26);
    assert_eq!(settlement.outcome, Outcome::PlayerWins);
    assert_eq!(table.chips(), 1_000 + STAKE);
}

#[test]
fn dealer_stands_on_soft_seventeen() {
    let mut table = stacked(&[
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Nine, Suit::Diamonds),
        card(Rank::Ace, Suit::Spades),
        card(Rank::Six, Suit::Hearts),
    ]);
    let view = table.new_round().unwrap();
    assert_eq!(view.dealer_up_card, card(Rank::Six, Suit::Hearts));
    let settlement = table.stand().unwrap();
    assert_eq!(settlement.dealer_hand.len(), 2);
    assert_eq!(settlement.dealer_score, 17);
    assert_eq!(settlement.outcome, Outcome::PlayerWins);
}

#[test]
fn eager_timing_counts_hole_card_once() {
    let mut table = Table::new(TableConfig {
        num_decks: 1,
        seed: 4,
        hole_card_timing: HoleCardTiming::Eager,
        ..TableConfig::default()
    })
    .unwrap();
    table
        .stack_shoe(&[
            card(Rank::Ten, Suit::Clubs),
            card(Rank::Nine, Suit::Diamonds),
            card(Rank::Two, Suit::Spades),
            card(Rank::Eight, Suit::Hearts),
            card(Rank::Seven, Suit::Clubs),
        ])
        .unwrap();
    table.new_round().unwrap();
    assert_eq!(table.current_count().running, 0);

    let settlement = table.stand().unwrap();
    assert_eq!(settlement.dealer_score, 17);
    assert_eq!(table.current_count().running, 0);
}

#[test]
fn actions_out_of_turn_leave_state_alone() {
    let mut table = table(1, 2);
    assert!(matches!(
        table.hit(),
        Err(TableError::InvalidAction { action: "hit", phase: Phase::Betting })
    ));
    assert!(table.stand().is_err());
    assert!(table.suggest_move().is_err());
    assert!(table.abort_round().is_err());
    assert_eq!(table.shoe_remaining(), 52);

    let view = table.new_round().unwrap();
    assert!(matches!(
        table.new_round(),
        Err(TableError::InvalidAction { phase: Phase::PlayerTurn, .. })
    ));
    assert!(table.stack_shoe(&[]).is_err());
    assert_eq!(table.player_cards(), view.player_hand.as_slice());
    assert_eq!(table.shoe_remaining(), 48);
}

#[test]
fn abort_round_keeps_chips_and_count() {
    let mut table = table(1, 6);
    table.new_round().unwrap();
    let count = table.current_count();
    table.abort_round().unwrap();
    assert_eq!(table.phase(), Phase::Betting);
    assert_eq!(table.chips(), 1_000);
    assert_eq!(table.current_count(), count);
    assert!(table.player_cards().is_empty());
    assert_eq!(table.shoe_remaining(), 48);
}

#[test]
fn new_round_below_threshold_rebuilds_and_recounts() {
    let mut table = table(1, 23);
    while table.shoe_remaining() >= 10 {
        match table.new_round().and_then(|_| table.stand()) {
            Ok(_) | Err(TableError::EmptyShoe) => {}
            Err(err) => panic!("{err}"),
        }
    }
    let reshuffles = table.reshuffles();

    let view = table.new_round().unwrap();
    assert_eq!(table.reshuffles(), reshuffles + 1);
    assert_eq!(table.shoe_remaining(), 52 - 4);
    let mut exposed = view.player_hand.clone();
    exposed.push(view.dealer_up_card);
    assert_eq!(table.current_count().running, counter::update(&exposed, 0));
}

#[test]
fn empty_shoe_mid_round_rebuilds_and_abandons_round() {
    let mut table = Table::new(TableConfig {
        num_decks: 1,
        seed: 31,
        reshuffle_threshold: 0,
        ..TableConfig::default()
    })
    .unwrap();

    let err = loop {
        let chips = table.chips();
        match table.new_round().and_then(|_| table.stand()) {
            Ok(_) => continue,
            Err(err) => {
                assert_eq!(table.chips(), chips);
                break err;
            }
        }
    };
    assert_eq!(err, TableError::EmptyShoe);
    assert_eq!(table.phase(), Phase::Betting);
    assert_eq!(table.shoe_remaining(), 52);
    assert_eq!(table.current_count().running, 0);
    assert_eq!(table.reshuffles(), 1);
    assert!(table.new_round().is_ok());
}

#[test]
fn count_tracks_every_exposed_card_across_rounds() {
    let mut table = table(2, 99);
    let mut seen = Vec::new();
    for _ in 0..12 {
        let before = table.reshuffles();
        let view = table.new_round().unwrap();
        if table.reshuffles() != before {
            seen.clear();
        }
        let settlement = match table.suggest_move().unwrap().action {
            Action::Stand => table.stand().unwrap(),
            _ => match table.hit().unwrap().settlement {
                Some(settlement) => settlement,
                None => table.stand().unwrap(),
            },
        };
        assert!(settlement.player_hand.starts_with(&view.player_hand));
        seen.extend(&settlement.player_hand);
        seen.extend(&settlement.dealer_hand);
        assert_eq!(table.current_count().running, counter::update(&seen, 0));
    }
}

#[test]
fn true_count_uses_cards_left_in_shoe() {
    let mut table = table(4, 5);
    table.new_round().unwrap();
    let count = table.current_count();
    let decks_left = table.shoe_remaining() as f64 / 52.0;
    assert!((count.true_count - count.running as f64 / decks_left).abs() < 1e-9);
}
