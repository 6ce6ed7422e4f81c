//! Fixed enumerations every strategy is keyed by: player hand categories,
//! dealer upcards and the legal actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StrategyError;

pub const HAND_COUNT: usize = 34;
pub const UPCARD_COUNT: usize = 10;

const HARD_START: usize = 0;
const SOFT_START: usize = 16;
const PAIR_START: usize = 24;

/// Labels in ordinal order: hard 5..20, soft A2..A9, pairs 22..AA.
const HAND_LABELS: [&str; HAND_COUNT] = [
    "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17", "18", "19", "20",
    "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9",
    "22", "33", "44", "55", "66", "77", "88", "99", "TT", "AA",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    Hard,
    Soft,
    Pair,
}

impl HandCategory {
    pub const ALL: [HandCategory; 3] = [HandCategory::Hard, HandCategory::Soft, HandCategory::Pair];

    pub fn title(&self) -> &'static str {
        match self {
            HandCategory::Hard => "Hard Totals",
            HandCategory::Soft => "Soft Totals",
            HandCategory::Pair => "Pairs",
        }
    }

    /// Section name in the engine chart format.
    pub fn chart_key(&self) -> &'static str {
        match self {
            HandCategory::Hard => "hard_totals",
            HandCategory::Soft => "soft_totals",
            HandCategory::Pair => "pairs",
        }
    }

    pub fn hands(&self) -> impl Iterator<Item = HandKey> {
        let range = match self {
            HandCategory::Hard => HARD_START..SOFT_START,
            HandCategory::Soft => SOFT_START..PAIR_START,
            HandCategory::Pair => PAIR_START..HAND_COUNT,
        };
        range.map(|ordinal| HandKey(ordinal as u8))
    }
}

/// A player hand category, stored as its ordinal in the fixed hand space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandKey(u8);

impl HandKey {
    pub fn hard(total: u8) -> Option<Self> {
        (5..=20).contains(&total).then(|| HandKey(total - 5))
    }

    /// Soft hand `A<kicker>`, kicker 2..=9.
    pub fn soft(kicker: u8) -> Option<Self> {
        (2..=9)
            .contains(&kicker)
            .then(|| HandKey((SOFT_START as u8) + kicker - 2))
    }

    /// Pair of `value`s, 2..=10 with 11 for aces.
    pub fn pair(value: u8) -> Option<Self> {
        (2..=11)
            .contains(&value)
            .then(|| HandKey((PAIR_START as u8) + value - 2))
    }

    pub fn parse(label: &str) -> Option<Self> {
        HAND_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .map(|ordinal| HandKey(ordinal as u8))
    }

    pub fn all() -> impl Iterator<Item = HandKey> {
        (0..HAND_COUNT).map(|ordinal| HandKey(ordinal as u8))
    }

    pub fn ordinal(&self) -> usize {
        self.0 as usize
    }

    pub fn label(&self) -> &'static str {
        HAND_LABELS[self.ordinal()]
    }

    pub fn category(&self) -> HandCategory {
        match self.ordinal() {
            o if o < SOFT_START => HandCategory::Hard,
            o if o < PAIR_START => HandCategory::Soft,
            _ => HandCategory::Pair,
        }
    }

    /// Player total for hard and soft hands, pair card value for pairs.
    pub fn value(&self) -> u8 {
        let o = self.ordinal();
        match self.category() {
            HandCategory::Hard => (o - HARD_START) as u8 + 5,
            HandCategory::Soft => (o - SOFT_START) as u8 + 13,
            HandCategory::Pair => (o - PAIR_START) as u8 + 2,
        }
    }

    /// Hand label inside its engine chart section: "12", soft "7" for A7,
    /// pair "8", "T" or "A".
    pub fn chart_label(&self) -> String {
        let label = self.label();
        match self.category() {
            HandCategory::Hard => label.to_string(),
            HandCategory::Soft | HandCategory::Pair => label[1..].to_string(),
        }
    }

    pub fn from_chart_label(category: HandCategory, label: &str) -> Option<Self> {
        match category {
            HandCategory::Hard => label.parse::<u8>().ok().and_then(HandKey::hard),
            HandCategory::Soft => label.parse::<u8>().ok().and_then(HandKey::soft),
            HandCategory::Pair => match label {
                "T" | "10" => HandKey::pair(10),
                "A" | "11" => HandKey::pair(11),
                other => other
                    .parse::<u8>()
                    .ok()
                    .filter(|v| (2..=9).contains(v))
                    .and_then(HandKey::pair),
            },
        }
    }
}

impl fmt::Display for HandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpCard {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Ace,
}

impl UpCard {
    pub const ALL: [UpCard; UPCARD_COUNT] = [
        UpCard::Two,
        UpCard::Three,
        UpCard::Four,
        UpCard::Five,
        UpCard::Six,
        UpCard::Seven,
        UpCard::Eight,
        UpCard::Nine,
        UpCard::Ten,
        UpCard::Ace,
    ];

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UpCard::Two => "2",
            UpCard::Three => "3",
            UpCard::Four => "4",
            UpCard::Five => "5",
            UpCard::Six => "6",
            UpCard::Seven => "7",
            UpCard::Eight => "8",
            UpCard::Nine => "9",
            UpCard::Ten => "T",
            UpCard::Ace => "A",
        }
    }

    /// Blackjack value of the card, aces counted as 11.
    pub fn value(&self) -> u8 {
        self.ordinal() as u8 + 2
    }

    /// Engine chart spelling: "2".."10", "11".
    pub fn chart_symbol(&self) -> String {
        self.value().to_string()
    }

    pub fn parse(symbol: &str) -> Option<Self> {
        UpCard::ALL.into_iter().find(|card| card.symbol() == symbol)
    }

    pub fn from_chart_symbol(symbol: &str) -> Option<Self> {
        let value = symbol.parse::<u8>().ok()?;
        (2..=11)
            .contains(&value)
            .then(|| UpCard::ALL[(value - 2) as usize])
    }
}

impl fmt::Display for UpCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit,
        Action::Stand,
        Action::Double,
        Action::Split,
        Action::Surrender,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::Double => "D",
            Action::Split => "P",
            Action::Surrender => "Sr",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Action {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.symbol() == s)
            .ok_or_else(|| StrategyError::InvalidAction(s.to_string()))
    }
}
