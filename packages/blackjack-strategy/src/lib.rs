mod basic;
mod betting;
mod chart;
mod error;
mod hand_space;
mod playing;

pub use basic::{
    basic_action, basic_strategy, flat_bet, hi_lo_spread, DEFAULT_BETTING, DEFAULT_PLAYING,
    HI_LO_SPREAD,
};
pub use betting::{
    parse_condition, BettingRule, BettingStrategy, BettingWire, Comparison, RuleWire,
    DEFAULT_BET_UNITS,
};
pub use chart::{ChartSection, EngineChart};
pub use error::StrategyError;
pub use hand_space::{Action, HandCategory, HandKey, UpCard, HAND_COUNT, UPCARD_COUNT};
pub use playing::{LoadReport, PlayingStrategy, PlayingTable, CELL_COUNT};
