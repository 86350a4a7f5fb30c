//! Session error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{entities::AmountField, state_machine::SessionPhase};

/// Inbound operations, named for error messages.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Operation {
    BeginSession,
    SetBuyIn,
    SelectPlayer,
    FinishSelection,
    RequestBalances,
    SubmitBalance,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::BeginSession => "start a game",
            Self::SetBuyIn => "set the buy-in",
            Self::SelectPlayer => "select players",
            Self::FinishSelection => "finish selecting players",
            Self::RequestBalances => "collect balances",
            Self::SubmitBalance => "submit a balance",
        };
        write!(f, "{repr}")
    }
}

/// Errors raised by roster, session and history operations.
///
/// None of these are fatal. Whatever raised one left its state exactly as it
/// was, so the caller only has to report the message and ask again.
#[derive(Clone, Debug, Deserialize, Error, PartialEq, Serialize)]
pub enum SessionError {
    /// Malformed numeric input for a buy-in or balance
    #[error("{input:?} is not a valid {field}")]
    Validation { field: AmountField, input: String },

    /// Empty or unknown player name, or an empty selection
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} is not part of this game")]
    NotAParticipant(String),

    #[error("no game in progress")]
    NoActiveSession,

    #[error("can't {operation} while {phase}")]
    WrongPhase {
        operation: Operation,
        phase: SessionPhase,
    },

    /// Restart refused because the current game must be abandoned first
    #[error("a game is already in progress")]
    SessionInProgress,

    #[error("no reset is waiting for confirmation")]
    NoPendingReset,
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
