pub mod contract;
pub mod error;
pub mod msg;
pub mod state;
pub mod strategy_logic;

pub use crate::error::ContractError;
