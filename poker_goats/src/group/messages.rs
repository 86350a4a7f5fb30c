//! Group actor message types.

use serde::Serialize;
use tokio::sync::oneshot;

use super::GroupId;
use crate::{
    history::{CompletedSession, ResetOutcome},
    roster::PlayerId,
    session::{Amount, SessionError, SessionEvent, SessionPhase, SessionResult, Submission},
};

/// Inbound operations, one per core call.
#[derive(Clone, Debug, PartialEq)]
pub enum GroupCommand {
    AddPlayers(Vec<String>),
    ListPlayers,
    BeginSession,
    AbandonSession,
    SetBuyIn(String),
    SelectPlayer(String),
    FinishSelection,
    RequestBalances,
    SubmitBalance { player: String, text: String },
    RequestReset,
    ConfirmReset(String),
    ListHistory,
    GetStatus,
}

/// Messages that can be sent to a GroupActor
#[derive(Debug)]
pub enum GroupMessage {
    /// Run one command against the group's state
    Command {
        command: GroupCommand,
        response: oneshot::Sender<GroupResponse>,
    },

    /// Stop the actor after answering
    Close { response: oneshot::Sender<()> },
}

/// Payload of a successful command.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Done,
    PlayersAdded(Vec<PlayerId>),
    Players(Vec<PlayerId>),
    BuyIn(Amount),
    Submission(Submission),
    Reset(ResetOutcome),
    History(Vec<CompletedSession>),
    Status(GroupStatus),
}

/// Outcome of one command plus the notifications it produced, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupResponse {
    pub result: SessionResult<Reply>,
    pub events: Vec<SessionEvent>,
}

impl GroupResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&SessionError> {
        self.result.as_ref().err()
    }

    /// Whether the command changed roster or history, which are the parts
    /// that get persisted.
    #[must_use]
    pub fn changes_durable_state(&self) -> bool {
        match &self.result {
            Ok(Reply::PlayersAdded(added)) => !added.is_empty(),
            Ok(Reply::Submission(Submission::Completed(_))) => true,
            Ok(Reply::Reset(ResetOutcome::Cleared(_))) => true,
            _ => false,
        }
    }
}

/// Read-only summary of a group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupStatus {
    pub group_id: GroupId,
    pub phase: SessionPhase,
    pub buy_in: Option<Amount>,
    pub participants: Vec<PlayerId>,
    /// Participants yet to report a balance
    pub missing: Vec<PlayerId>,
    pub balances_requested: bool,
    pub roster_size: usize,
    pub history_len: usize,
    pub reset_pending: bool,
}
