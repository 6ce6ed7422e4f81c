use std::collections::BTreeMap;
use std::fmt;

use cosmwasm_schema::{cw_serde, QueryResponses};

/// Hand label -> dealer upcard symbol -> action symbol, e.g. `{"16": {"T": "Sr"}}`.
pub type PlayingTable = BTreeMap<String, BTreeMap<String, String>>;

#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum StrategyKind {
    Playing,
    Betting,
}

impl StrategyKind {
    pub fn title(&self) -> &'static str {
        match self {
            StrategyKind::Playing => "Playing",
            StrategyKind::Betting => "Betting",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Playing => f.write_str("playing"),
            StrategyKind::Betting => f.write_str("betting"),
        }
    }
}

#[cw_serde]
pub struct BettingRuleMsg {
    /// `true_count <op> <threshold>`, op one of >=, <=, =, >, <
    pub condition: String,
    /// Always "bet"
    pub action: String,
    pub value: i64,
}

#[cw_serde]
pub struct BettingStrategyMsg {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<BettingRuleMsg>,
}

#[cw_serde]
pub struct SeedPlaying {
    pub name: String,
    pub strategy: PlayingTable,
}

/// Built-in entries. They can be read but never overwritten or deleted.
#[cw_serde]
pub struct InstantiateMsg {
    pub playing: Vec<SeedPlaying>,
    pub betting: Vec<BettingStrategyMsg>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Create or overwrite a custom playing strategy. The table must cover
    /// every hand/upcard cell.
    SavePlaying {
        name: String,
        strategy: PlayingTable,
    },
    SaveBetting {
        name: String,
        strategy: BettingStrategyMsg,
    },
    DeleteStrategy {
        kind: StrategyKind,
        name: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// All entries of one kind, ordered by name
    #[returns(Vec<LibraryEntry>)]
    ListStrategies { kind: StrategyKind },
    #[returns(Option<PlayingTable>)]
    GetPlaying { name: String },
    #[returns(Option<BettingStrategyMsg>)]
    GetBetting { name: String },
}

#[cw_serde]
pub struct LibraryEntry {
    pub name: String,
    pub is_custom: bool,
    pub kind: StrategyKind,
}
