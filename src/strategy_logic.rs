use blackjack_strategy::{
    basic_strategy, flat_bet, hi_lo_spread, BettingStrategy, BettingWire, EngineChart,
    PlayingStrategy, RuleWire, DEFAULT_PLAYING,
};

use crate::error::ContractError;
use crate::msg::{
    BettingRuleMsg, BettingStrategyMsg, InstantiateMsg, PlayingTable, SeedPlaying, StrategyKind,
};

pub const MAX_NAME_LEN: usize = 128;

/// Canonical storage key for a user supplied name: surrounding whitespace
/// and a trailing `.json` are dropped.
pub fn canonical_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".json").unwrap_or(trimmed).trim_end()
}

pub fn validate_name(raw: &str) -> Result<String, ContractError> {
    let name = canonical_name(raw);
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() > MAX_NAME_LEN {
        "name is too long"
    } else if name.contains("..") || name.contains('/') || name.contains('\\') {
        "name must not contain '..', '/' or '\\'"
    } else if name.chars().any(char::is_control) {
        "name must not contain control characters"
    } else {
        return Ok(name.to_string());
    };
    Err(ContractError::InvalidName {
        reason: reason.to_string(),
    })
}

/// Accepts only a table that names every cell with a legal action and
/// nothing outside the hand space.
pub fn playing_chart(table: &PlayingTable) -> Result<EngineChart, ContractError> {
    let invalid = |reason: String| ContractError::InvalidStrategy {
        kind: StrategyKind::Playing,
        reason,
    };

    let (strategy, report) = PlayingStrategy::from_table(table);
    if let Some((hand, upcard, symbol)) = report.invalid.first() {
        return Err(invalid(format!(
            "illegal action '{symbol}' for hand {hand} against {upcard}"
        )));
    }
    if let Some((hand, upcard)) = report.unknown.first() {
        return Err(invalid(format!("unknown cell {hand}/{upcard}")));
    }
    let missing = PlayingStrategy::missing_cells(table);
    if let Some((hand, upcard)) = missing.first() {
        return Err(invalid(format!(
            "{} cells missing, first is hand {hand} against {upcard}",
            missing.len()
        )));
    }
    Ok(EngineChart::from_strategy(&strategy))
}

pub fn to_betting_wire(msg: &BettingStrategyMsg) -> BettingWire {
    BettingWire {
        name: msg.name.clone(),
        description: msg.description.clone(),
        rules: msg
            .rules
            .iter()
            .map(|rule| RuleWire {
                condition: rule.condition.clone(),
                action: rule.action.clone(),
                value: rule.value,
            })
            .collect(),
    }
}

pub fn to_betting_msg(strategy: &BettingStrategy) -> BettingStrategyMsg {
    let wire = strategy.to_wire();
    BettingStrategyMsg {
        name: wire.name,
        description: wire.description,
        rules: wire
            .rules
            .into_iter()
            .map(|rule| BettingRuleMsg {
                condition: rule.condition,
                action: rule.action,
                value: rule.value,
            })
            .collect(),
    }
}

/// Parses `msg` and returns its canonical form stored under `name`.
pub fn betting_strategy(name: &str, msg: &BettingStrategyMsg) -> Result<BettingStrategyMsg, ContractError> {
    let mut strategy =
        BettingStrategy::from_wire(&to_betting_wire(msg)).map_err(|e| ContractError::InvalidStrategy {
            kind: StrategyKind::Betting,
            reason: e.to_string(),
        })?;
    strategy.name = name.to_string();
    Ok(to_betting_msg(&strategy))
}

impl InstantiateMsg {
    /// The standard built-in set: S17 basic strategy, flat bet and a Hi-Lo spread.
    pub fn with_defaults() -> Self {
        InstantiateMsg {
            playing: vec![SeedPlaying {
                name: DEFAULT_PLAYING.to_string(),
                strategy: basic_strategy().to_table(),
            }],
            betting: vec![to_betting_msg(&flat_bet()), to_betting_msg(&hi_lo_spread())],
        }
    }
}
