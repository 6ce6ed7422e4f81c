use blackjack_strategy::StrategyError;
use strategy_library::msg::StrategyKind;
use thiserror::Error;

use crate::session::Operation;

/// Failures reported by a strategy library. Each variant keeps the raw detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ImmutableEntry(String),
    #[error("Library rejected the request: {0}")]
    Rejected(String),
    #[error("Strategy library unavailable: {0}")]
    Unavailable(String),
}

impl LibraryError {
    /// Maps a failed contract call onto the library taxonomy. Only the
    /// contract's own message is kept and matched, never the envelope around
    /// it, which echoes the request.
    pub fn from_contract(detail: &str) -> Self {
        let message = root_cause(detail).to_string();
        if message.ends_with("is built-in and cannot be modified or deleted") {
            LibraryError::ImmutableEntry(message)
        } else if message.ends_with("' not found") {
            LibraryError::NotFound(message)
        } else {
            LibraryError::Rejected(message)
        }
    }
}

/// Last line of a chain error with any `kind: .., error: ` prefixes removed.
fn root_cause(detail: &str) -> &str {
    let mut cause = detail.lines().last().unwrap_or(detail).trim();
    while let Some(rest) = cause.strip_prefix("kind: ") {
        match rest.split_once(", error: ") {
            Some((kind, message)) if !kind.contains(' ') => cause = message,
            _ => break,
        }
    }
    cause
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Detected locally; nothing was sent to the library.
    #[error("{0}")]
    Validation(String),
    #[error("A {op} request for {kind} strategies is already in progress")]
    Busy { kind: StrategyKind, op: Operation },
    #[error("Ignored an outdated {kind} response")]
    Stale { kind: StrategyKind },
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}
