//! Range-compressed chart form used by the simulation engine.
//!
//! Each section maps an engine hand label to dealer ranges, e.g.
//! `hard_totals["12"]["4-6"] = "S"`. Upcards are spelled by value with
//! T = 10 and A = 11.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hand_space::{HandCategory, HandKey, UpCard};
use crate::playing::{PlayingStrategy, PlayingTable};

pub type ChartSection = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineChart {
    #[serde(default)]
    pub hard_totals: ChartSection,
    #[serde(default)]
    pub soft_totals: ChartSection,
    #[serde(default)]
    pub pairs: ChartSection,
}

impl EngineChart {
    pub fn section(&self, category: HandCategory) -> &ChartSection {
        match category {
            HandCategory::Hard => &self.hard_totals,
            HandCategory::Soft => &self.soft_totals,
            HandCategory::Pair => &self.pairs,
        }
    }

    fn section_mut(&mut self, category: HandCategory) -> &mut ChartSection {
        match category {
            HandCategory::Hard => &mut self.hard_totals,
            HandCategory::Soft => &mut self.soft_totals,
            HandCategory::Pair => &mut self.pairs,
        }
    }

    pub fn from_strategy(strategy: &PlayingStrategy) -> Self {
        let mut chart = Self::default();
        for category in HandCategory::ALL {
            let section = chart.section_mut(category);
            for hand in category.hands() {
                section.insert(hand.chart_label(), compress_row(strategy, hand));
            }
        }
        chart
    }

    /// Flat wire table. Entries that do not name a known hand or a valid
    /// dealer range are skipped.
    pub fn to_table(&self) -> PlayingTable {
        let mut table = PlayingTable::new();
        for category in HandCategory::ALL {
            for (label, ranges) in self.section(category) {
                let Some(hand) = HandKey::from_chart_label(category, label) else {
                    continue;
                };
                for (range, action) in ranges {
                    let Some((low, high)) = parse_range(range) else {
                        continue;
                    };
                    let row = table.entry(hand.label().to_string()).or_default();
                    for upcard in &UpCard::ALL[(low - 2) as usize..=(high - 2) as usize] {
                        row.insert(upcard.symbol().to_string(), action.clone());
                    }
                }
            }
        }
        table
    }

    pub fn to_strategy(&self) -> PlayingStrategy {
        PlayingStrategy::from_table(&self.to_table()).0
    }

    /// Number of range entries across all sections.
    pub fn range_count(&self) -> usize {
        HandCategory::ALL
            .iter()
            .flat_map(|category| self.section(*category).values())
            .map(BTreeMap::len)
            .sum()
    }
}

fn compress_row(strategy: &PlayingStrategy, hand: HandKey) -> BTreeMap<String, String> {
    let row = strategy.row(hand);
    let mut ranges = BTreeMap::new();
    let mut start = 0;
    while start < row.len() {
        let mut end = start;
        while end + 1 < row.len() && row[end + 1] == row[start] {
            end += 1;
        }
        let (low, high) = (UpCard::ALL[start], UpCard::ALL[end]);
        let key = if start == end {
            low.chart_symbol()
        } else {
            format!("{}-{}", low.chart_symbol(), high.chart_symbol())
        };
        ranges.insert(key, row[start].symbol().to_string());
        start = end + 1;
    }
    ranges
}

/// `"7"` or `"2-6"` as inclusive upcard values within 2..=11.
fn parse_range(range: &str) -> Option<(u8, u8)> {
    let (low, high) = match range.split_once('-') {
        Some((low, high)) => (low.trim(), high.trim()),
        None => (range.trim(), range.trim()),
    };
    let low = UpCard::from_chart_symbol(low)?.value();
    let high = UpCard::from_chart_symbol(high)?.value();
    (low <= high).then_some((low, high))
}
