use cosmwasm_std::StdError;
use thiserror::Error;

use crate::msg::StrategyKind;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{kind} strategy '{name}' is built-in and cannot be modified or deleted")]
    ImmutableEntry { kind: StrategyKind, name: String },

    #[error("{kind} strategy '{name}' not found")]
    NotFound { kind: StrategyKind, name: String },

    #[error("Invalid strategy name: {reason}")]
    InvalidName { reason: String },

    #[error("Invalid {kind} strategy: {reason}")]
    InvalidStrategy { kind: StrategyKind, reason: String },
}
