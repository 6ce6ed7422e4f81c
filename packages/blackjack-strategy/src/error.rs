use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown cell: hand '{hand}', dealer upcard '{upcard}'")]
    KeyNotFound { hand: String, upcard: String },
    #[error("Invalid action '{0}' (expected one of H, S, D, P, Sr)")]
    InvalidAction(String),
    #[error("Invalid betting rule: {0}")]
    InvalidRule(String),
    #[error("Rule index {index} out of range ({len} rules)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Malformed condition '{0}' (expected e.g. 'true_count >= 2')")]
    MalformedCondition(String),
}
