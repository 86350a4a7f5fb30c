//! History log of completed sessions and the reset confirmation flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    roster::PlayerId,
    session::{
        entities::Amount,
        errors::{SessionError, SessionResult},
    },
};

/// Immutable snapshot of a session taken the moment it completed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CompletedSession {
    pub id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub buy_in: Amount,
    pub participants: Vec<PlayerId>,
    pub final_balances: HashMap<PlayerId, Amount>,
}

impl CompletedSession {
    /// Final balances in participant order.
    pub fn balances(&self) -> impl Iterator<Item = (&PlayerId, Amount)> {
        self.participants.iter().filter_map(|p| {
            self.final_balances
                .get(p)
                .map(|&amount| (p, amount))
        })
    }

    /// One `name: $amount` line per participant.
    #[must_use]
    pub fn balance_table(&self) -> String {
        self.balances()
            .map(|(player, amount)| format!("{player}: ${amount}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Append-only, ordered record of completed sessions.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    sessions: Vec<CompletedSession>,
}

impl HistoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, session: CompletedSession) {
        self.sessions.push(session);
    }

    /// Remove every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.sessions.len();
        self.sessions.clear();
        removed
    }

    #[must_use]
    pub fn sessions(&self) -> &[CompletedSession] {
        &self.sessions
    }

    #[must_use]
    pub fn last(&self) -> Option<&CompletedSession> {
        self.sessions.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// State of the reset confirmation flow. Independent of the session phase.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConfirmationState {
    #[default]
    Idle,
    ConfirmReset,
}

/// What a confirmation reply did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResetOutcome {
    /// History was cleared; carries the number of sessions removed.
    Cleared(usize),
    Cancelled,
}

/// Two-step guard in front of [`HistoryLog::clear`].
#[derive(Debug, Default)]
pub struct ResetConfirmation {
    state: ConfirmationState,
}

impl ResetConfirmation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == ConfirmationState::ConfirmReset
    }

    pub fn request(&mut self) {
        self.state = ConfirmationState::ConfirmReset;
    }

    /// Only a reply of `yes` (trimmed, any case) clears the log. Any reply
    /// returns the flow to idle.
    pub fn confirm(&mut self, raw: &str, history: &mut HistoryLog) -> SessionResult<ResetOutcome> {
        if !self.is_pending() {
            return Err(SessionError::NoPendingReset);
        }
        self.state = ConfirmationState::Idle;

        if raw.trim().to_lowercase() == "yes" {
            let removed = history.clear();
            log::info!("History cleared, {removed} sessions removed");
            Ok(ResetOutcome::Cleared(removed))
        } else {
            log::debug!("History reset cancelled");
            Ok(ResetOutcome::Cancelled)
        }
    }
}
