use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hand_space::{Action, HandKey, UpCard, HAND_COUNT, UPCARD_COUNT};
use crate::StrategyError;

/// Wire form of a playing strategy: hand label -> upcard symbol -> action symbol.
pub type PlayingTable = BTreeMap<String, BTreeMap<String, String>>;

pub const CELL_COUNT: usize = HAND_COUNT * UPCARD_COUNT;

/// What `PlayingStrategy::load` did with each cell of the incoming table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: usize,
    /// Cells whose hand or upcard is outside the fixed hand space.
    pub unknown: Vec<(String, String)>,
    /// Cells carrying a symbol that is not a legal action; prior value kept.
    pub invalid: Vec<(String, String, String)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.invalid.is_empty()
    }

    /// Cells of the hand space that kept their previous action.
    pub fn retained(&self) -> usize {
        CELL_COUNT - self.applied
    }
}

/// Complete decision table over the 34 x 10 hand space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlayingTable", into = "PlayingTable")]
pub struct PlayingStrategy {
    cells: [[Action; UPCARD_COUNT]; HAND_COUNT],
}

impl PlayingStrategy {
    pub fn new() -> Self {
        Self::filled(Action::default())
    }

    pub fn filled(action: Action) -> Self {
        Self {
            cells: [[action; UPCARD_COUNT]; HAND_COUNT],
        }
    }

    pub fn from_fn(mut decide: impl FnMut(HandKey, UpCard) -> Action) -> Self {
        let mut strategy = Self::new();
        for hand in HandKey::all() {
            for upcard in UpCard::ALL {
                strategy.set_action(hand, upcard, decide(hand, upcard));
            }
        }
        strategy
    }

    pub fn action(&self, hand: HandKey, upcard: UpCard) -> Action {
        self.cells[hand.ordinal()][upcard.ordinal()]
    }

    pub fn set_action(&mut self, hand: HandKey, upcard: UpCard, action: Action) {
        self.cells[hand.ordinal()][upcard.ordinal()] = action;
    }

    pub fn row(&self, hand: HandKey) -> &[Action; UPCARD_COUNT] {
        &self.cells[hand.ordinal()]
    }

    pub fn get(&self, hand: &str, upcard: &str) -> Result<Action, StrategyError> {
        let (hand, upcard) = resolve_cell(hand, upcard)?;
        Ok(self.action(hand, upcard))
    }

    pub fn set(&mut self, hand: &str, upcard: &str, action: &str) -> Result<(), StrategyError> {
        let (hand, upcard) = resolve_cell(hand, upcard)?;
        let action = action.parse::<Action>()?;
        self.set_action(hand, upcard, action);
        Ok(())
    }

    /// Overlays `table` onto the current cells. Cells missing from the table
    /// keep their value, so the strategy stays complete whatever the input.
    pub fn load(&mut self, table: &PlayingTable) -> LoadReport {
        let mut report = LoadReport::default();
        for (hand_label, row) in table {
            let hand = HandKey::parse(hand_label);
            for (upcard_symbol, symbol) in row {
                let (Some(hand), Some(upcard)) = (hand, UpCard::parse(upcard_symbol)) else {
                    report.unknown.push((hand_label.clone(), upcard_symbol.clone()));
                    continue;
                };
                match symbol.parse::<Action>() {
                    Ok(action) => {
                        self.set_action(hand, upcard, action);
                        report.applied += 1;
                    }
                    Err(_) => report.invalid.push((
                        hand_label.clone(),
                        upcard_symbol.clone(),
                        symbol.clone(),
                    )),
                }
            }
        }
        report
    }

    pub fn from_table(table: &PlayingTable) -> (Self, LoadReport) {
        let mut strategy = Self::new();
        let report = strategy.load(table);
        (strategy, report)
    }

    pub fn to_table(&self) -> PlayingTable {
        HandKey::all()
            .map(|hand| {
                let row = UpCard::ALL
                    .into_iter()
                    .map(|upcard| {
                        (
                            upcard.symbol().to_string(),
                            self.action(hand, upcard).symbol().to_string(),
                        )
                    })
                    .collect();
                (hand.label().to_string(), row)
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|action| Action::ALL.contains(action))
    }

    /// True when `table` names every cell of the hand space with a legal action.
    pub fn is_complete_table(table: &PlayingTable) -> bool {
        Self::missing_cells(table).is_empty()
    }

    pub fn missing_cells(table: &PlayingTable) -> Vec<(HandKey, UpCard)> {
        let mut missing = Vec::new();
        for hand in HandKey::all() {
            let row = table.get(hand.label());
            for upcard in UpCard::ALL {
                let legal = row
                    .and_then(|row| row.get(upcard.symbol()))
                    .is_some_and(|symbol| symbol.parse::<Action>().is_ok());
                if !legal {
                    missing.push((hand, upcard));
                }
            }
        }
        missing
    }

    /// Number of cells whose action differs from `other`.
    pub fn diff_count(&self, other: &PlayingStrategy) -> usize {
        self.cells
            .iter()
            .flatten()
            .zip(other.cells.iter().flatten())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl Default for PlayingStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PlayingTable> for PlayingStrategy {
    fn from(table: PlayingTable) -> Self {
        Self::from_table(&table).0
    }
}

impl From<PlayingStrategy> for PlayingTable {
    fn from(strategy: PlayingStrategy) -> Self {
        strategy.to_table()
    }
}

fn resolve_cell(hand: &str, upcard: &str) -> Result<(HandKey, UpCard), StrategyError> {
    match (HandKey::parse(hand), UpCard::parse(upcard)) {
        (Some(hand), Some(upcard)) => Ok((hand, upcard)),
        _ => Err(StrategyError::KeyNotFound {
            hand: hand.to_string(),
            upcard: upcard.to_string(),
        }),
    }
}
