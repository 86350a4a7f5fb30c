//! Everything one group owns, behind a synchronous API.
//!
//! The roster, session machine, history log and reset flag for a group live
//! together here so nothing is process-global. [`GroupState::apply`] runs a
//! single [`GroupCommand`] to completion and collects the events it queued.

use super::{
    GroupId,
    messages::{GroupCommand, GroupResponse, GroupStatus, Reply},
};
use crate::{
    history::{CompletedSession, HistoryLog, ResetConfirmation, ResetOutcome},
    roster::{PlayerId, Roster},
    session::{
        Amount, SessionEvent, SessionMachine, SessionResult, SessionRules, Submission,
    },
    store::GroupSnapshot,
};

#[derive(Debug)]
pub struct GroupState {
    id: GroupId,
    roster: Roster,
    machine: SessionMachine,
    history: HistoryLog,
    reset: ResetConfirmation,
}

impl GroupState {
    #[must_use]
    pub fn new(id: GroupId, rules: SessionRules) -> Self {
        Self::restore(id, rules, GroupSnapshot::default())
    }

    /// Rebuild a group from persisted roster and history. The session always
    /// starts idle.
    #[must_use]
    pub fn restore(id: GroupId, rules: SessionRules, snapshot: GroupSnapshot) -> Self {
        Self {
            id,
            roster: snapshot.roster,
            machine: SessionMachine::new(rules),
            history: snapshot.history,
            reset: ResetConfirmation::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    #[must_use]
    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            roster: self.roster.clone(),
            history: self.history.clone(),
        }
    }

    /// Run one command and collect the events it produced.
    pub fn apply(&mut self, command: GroupCommand) -> GroupResponse {
        let result = match command {
            GroupCommand::AddPlayers(names) => {
                self.add_players(names.as_slice()).map(Reply::PlayersAdded)
            }
            GroupCommand::ListPlayers => Ok(Reply::Players(self.list_players())),
            GroupCommand::BeginSession => self.begin_session().map(|()| Reply::Done),
            GroupCommand::AbandonSession => self.abandon_session().map(|()| Reply::Done),
            GroupCommand::SetBuyIn(text) => self.set_buy_in(&text).map(Reply::BuyIn),
            GroupCommand::SelectPlayer(pick) => self.select_player(&pick).map(|()| Reply::Done),
            GroupCommand::FinishSelection => self.finish_selection().map(|()| Reply::Done),
            GroupCommand::RequestBalances => self.request_balances().map(|()| Reply::Done),
            GroupCommand::SubmitBalance { player, text } => {
                self.submit_balance(&player, &text).map(Reply::Submission)
            }
            GroupCommand::RequestReset => {
                self.request_reset();
                Ok(Reply::Done)
            }
            GroupCommand::ConfirmReset(text) => self.confirm_reset(&text).map(Reply::Reset),
            GroupCommand::ListHistory => Ok(Reply::History(self.list_history())),
            GroupCommand::GetStatus => Ok(Reply::Status(self.status())),
        };

        if let Err(e) = &result {
            log::debug!("Group {}: command rejected: {}", self.id, e);
        }

        GroupResponse {
            result,
            events: self.machine.drain_events().into(),
        }
    }

    fn add_players<S: AsRef<str>>(&mut self, names: &[S]) -> SessionResult<Vec<PlayerId>> {
        let added = self.roster.add_players(names)?;
        let requested = names
            .iter()
            .map(|n| PlayerId::from(n.as_ref().trim()))
            .collect();
        self.machine.emit(SessionEvent::PlayersAdded {
            requested,
            added: added.clone(),
        });
        Ok(added)
    }

    #[must_use]
    pub fn list_players(&self) -> Vec<PlayerId> {
        self.roster.list_players()
    }

    fn begin_session(&mut self) -> SessionResult<()> {
        self.machine.begin_session()
    }

    fn abandon_session(&mut self) -> SessionResult<()> {
        self.machine.abandon_session()
    }

    fn set_buy_in(&mut self, text: &str) -> SessionResult<Amount> {
        self.machine.set_buy_in(text, &self.roster)
    }

    fn select_player(&mut self, pick: &str) -> SessionResult<()> {
        self.machine.select_player(pick, &self.roster)
    }

    fn finish_selection(&mut self) -> SessionResult<()> {
        self.machine.finish_selection()
    }

    fn request_balances(&mut self) -> SessionResult<()> {
        self.machine.request_balances()
    }

    fn submit_balance(&mut self, player: &str, text: &str) -> SessionResult<Submission> {
        self.machine.submit_balance(player, text, &mut self.history)
    }

    fn request_reset(&mut self) {
        self.reset.request();
        self.machine.emit(SessionEvent::ResetRequested);
    }

    fn confirm_reset(&mut self, text: &str) -> SessionResult<ResetOutcome> {
        let outcome = self.reset.confirm(text, &mut self.history)?;
        self.machine.emit(match outcome {
            ResetOutcome::Cleared(removed) => SessionEvent::HistoryCleared { removed },
            ResetOutcome::Cancelled => SessionEvent::ResetCancelled,
        });
        Ok(outcome)
    }

    #[must_use]
    pub fn list_history(&self) -> Vec<CompletedSession> {
        self.history.sessions().to_vec()
    }

    #[must_use]
    pub fn status(&self) -> GroupStatus {
        let session = self.machine.session();
        GroupStatus {
            group_id: self.id,
            phase: self.machine.phase(),
            buy_in: session.buy_in,
            participants: session.participants.clone(),
            missing: session.missing(),
            balances_requested: session.balances_requested,
            roster_size: self.roster.len(),
            history_len: self.history.len(),
            reset_pending: self.reset.is_pending(),
        }
    }
}
