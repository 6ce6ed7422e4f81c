use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StrategyError;

/// Bet placed when no rule matches the count.
pub const DEFAULT_BET_UNITS: u32 = 1;
pub const COUNT_VARIABLE: &str = "true_count";
pub const BET_ACTION: &str = "bet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    AtLeast,
    AtMost,
    Equal,
    Above,
    Below,
}

impl Comparison {
    pub const ALL: [Comparison; 5] = [
        Comparison::AtLeast,
        Comparison::AtMost,
        Comparison::Equal,
        Comparison::Above,
        Comparison::Below,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
            Comparison::Equal => "=",
            Comparison::Above => ">",
            Comparison::Below => "<",
        }
    }

    pub fn holds(&self, count: i32, threshold: i32) -> bool {
        match self {
            Comparison::AtLeast => count >= threshold,
            Comparison::AtMost => count <= threshold,
            Comparison::Equal => count == threshold,
            Comparison::Above => count > threshold,
            Comparison::Below => count < threshold,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparison {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(Comparison::AtLeast),
            "<=" => Ok(Comparison::AtMost),
            "=" | "==" => Ok(Comparison::Equal),
            ">" => Ok(Comparison::Above),
            "<" => Ok(Comparison::Below),
            other => Err(StrategyError::InvalidRule(format!(
                "unknown comparison '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingRule {
    pub comparison: Comparison,
    pub threshold: i32,
    pub bet_units: u32,
}

impl BettingRule {
    pub fn new(op: &str, threshold: i32, bet_units: i64) -> Result<Self, StrategyError> {
        let comparison = op.trim().parse::<Comparison>()?;
        Ok(Self {
            comparison,
            threshold,
            bet_units: positive_units(bet_units)?,
        })
    }

    pub fn matches(&self, count: i32) -> bool {
        self.comparison.holds(count, self.threshold)
    }

    /// Transport form of the comparison, e.g. `true_count >= 2`.
    pub fn condition(&self) -> String {
        format!("{COUNT_VARIABLE} {} {}", self.comparison, self.threshold)
    }

    pub fn to_wire(&self) -> RuleWire {
        RuleWire {
            condition: self.condition(),
            action: BET_ACTION.to_string(),
            value: self.bet_units as i64,
        }
    }

    pub fn from_wire(wire: &RuleWire) -> Result<Self, StrategyError> {
        let (comparison, threshold) = parse_condition(&wire.condition)?;
        if wire.action != BET_ACTION {
            return Err(StrategyError::InvalidRule(format!(
                "unsupported action '{}'",
                wire.action
            )));
        }
        Ok(Self {
            comparison,
            threshold,
            bet_units: positive_units(wire.value)?,
        })
    }
}

impl fmt::Display for BettingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "if true count {} {} bet {} units",
            self.comparison, self.threshold, self.bet_units
        )
    }
}

fn positive_units(units: i64) -> Result<u32, StrategyError> {
    if units <= 0 {
        return Err(StrategyError::InvalidRule(format!(
            "bet must be at least 1 unit, got {units}"
        )));
    }
    u32::try_from(units)
        .map_err(|_| StrategyError::InvalidRule(format!("bet of {units} units is too large")))
}

/// Parses `true_count <op> <threshold>`. Whitespace around the operator is
/// optional.
pub fn parse_condition(condition: &str) -> Result<(Comparison, i32), StrategyError> {
    let malformed = || StrategyError::MalformedCondition(condition.to_string());

    let rest = condition
        .trim()
        .strip_prefix(COUNT_VARIABLE)
        .ok_or_else(malformed)?
        .trim_start();
    let op_len = rest
        .chars()
        .take_while(|c| matches!(c, '<' | '>' | '='))
        .count();
    if op_len == 0 {
        return Err(malformed());
    }
    let (op, threshold) = rest.split_at(op_len);
    let comparison = op.parse::<Comparison>().map_err(|_| malformed())?;
    let threshold = threshold.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok((comparison, threshold))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleWire {
    pub condition: String,
    pub action: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingWire {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<RuleWire>,
}

/// Ordered count-threshold rules; the first matching rule decides the bet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingStrategy {
    pub name: String,
    pub description: String,
    rules: Vec<BettingRule>,
}

impl BettingStrategy {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = BettingRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[BettingRule] {
        &self.rules
    }

    pub fn add_rule(&mut self, op: &str, threshold: i32, bet_units: i64) -> Result<(), StrategyError> {
        self.rules.push(BettingRule::new(op, threshold, bet_units)?);
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<BettingRule, StrategyError> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    pub fn move_rule(&mut self, from: usize, to: usize) -> Result<(), StrategyError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), StrategyError> {
        if index >= self.rules.len() {
            return Err(StrategyError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(())
    }

    /// Bet for `count`: the first rule that holds wins, even if a later rule
    /// would also hold with a larger bet.
    pub fn evaluate(&self, count: i32) -> u32 {
        self.rules
            .iter()
            .find(|rule| rule.matches(count))
            .map_or(DEFAULT_BET_UNITS, |rule| rule.bet_units)
    }

    pub fn to_wire(&self) -> BettingWire {
        BettingWire {
            name: self.name.clone(),
            description: self.description.clone(),
            rules: self.rules.iter().map(BettingRule::to_wire).collect(),
        }
    }

    /// Replaces name, description and rules from `wire`. Nothing changes if
    /// any rule fails to parse.
    pub fn load(&mut self, wire: &BettingWire) -> Result<(), StrategyError> {
        let rules = wire
            .rules
            .iter()
            .map(BettingRule::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        self.name = wire.name.clone();
        self.description = wire.description.clone();
        self.rules = rules;
        Ok(())
    }

    pub fn from_wire(wire: &BettingWire) -> Result<Self, StrategyError> {
        let mut strategy = Self::default();
        strategy.load(wire)?;
        Ok(strategy)
    }
}
