use crate::betting::{BettingRule, BettingStrategy, Comparison};
use crate::hand_space::{Action, HandCategory, HandKey, UpCard};
use crate::playing::PlayingStrategy;

pub const DEFAULT_PLAYING: &str = "s17_basic_strategy";
pub const DEFAULT_BETTING: &str = "flat_bet";
pub const HI_LO_SPREAD: &str = "hi_lo_spread";

/// Basic strategy move for a multi-deck game where the dealer stands on soft
/// 17, doubling after split and late surrender are allowed.
pub fn basic_action(hand: HandKey, upcard: UpCard) -> Action {
    let dealer_value = upcard.value();
    let player_value = hand.value();

    match hand.category() {
        HandCategory::Pair => {
            match player_value {
                // Always split Aces and 8s
                11 | 8 => Action::Split,
                10 => Action::Stand,
                9 => {
                    // Split 9s except against 7, 10, or Ace
                    if matches!(dealer_value, 7 | 10 | 11) {
                        Action::Stand
                    } else {
                        Action::Split
                    }
                }
                // Never split 5s, play them as hard 10
                5 => hard_action(10, dealer_value),
                4 if matches!(dealer_value, 5 | 6) => Action::Split,
                4 => Action::Hit,
                6 if (2..=6).contains(&dealer_value) => Action::Split,
                // 7s, 3s and 2s split against 2-7
                7 | 3 | 2 if (2..=7).contains(&dealer_value) => Action::Split,
                _ => Action::Hit,
            }
        }
        HandCategory::Soft => soft_action(player_value, dealer_value),
        HandCategory::Hard => hard_action(player_value, dealer_value),
    }
}

fn soft_action(player_value: u8, dealer_value: u8) -> Action {
    match player_value {
        19.. => Action::Stand,
        18 => match dealer_value {
            3..=6 => Action::Double,
            2 | 7 | 8 => Action::Stand,
            _ => Action::Hit,
        },
        17 if (3..=6).contains(&dealer_value) => Action::Double,
        15 | 16 if (4..=6).contains(&dealer_value) => Action::Double,
        13 | 14 if (5..=6).contains(&dealer_value) => Action::Double,
        _ => Action::Hit,
    }
}

fn hard_action(player_value: u8, dealer_value: u8) -> Action {
    // Surrender comes before any stand/hit decision
    if player_value == 16 && matches!(dealer_value, 9 | 10 | 11) {
        return Action::Surrender;
    }
    if player_value == 15 && dealer_value == 10 {
        return Action::Surrender;
    }

    match player_value {
        17.. => Action::Stand,
        13..=16 if (2..=6).contains(&dealer_value) => Action::Stand,
        12 if (4..=6).contains(&dealer_value) => Action::Stand,
        11 if dealer_value <= 10 => Action::Double,
        10 if dealer_value <= 9 => Action::Double,
        9 if (3..=6).contains(&dealer_value) => Action::Double,
        _ => Action::Hit,
    }
}

pub fn basic_strategy() -> PlayingStrategy {
    PlayingStrategy::from_fn(basic_action)
}

pub fn flat_bet() -> BettingStrategy {
    BettingStrategy::new(DEFAULT_BETTING, "Always bet one unit")
}

pub fn hi_lo_spread() -> BettingStrategy {
    BettingStrategy::new(HI_LO_SPREAD, "Hi-Lo true count spread, 1 to 8 units").with_rules(
        [(5, 8), (4, 6), (3, 4), (2, 2)].map(|(threshold, bet_units)| BettingRule {
            comparison: Comparison::AtLeast,
            threshold,
            bet_units,
        }),
    )
}
