//! Session state machine.
//!
//! One game moves `Idle -> BuyInPending -> PlayerSelection -> InProgress`
//! and back to `Idle` once every participant has reported a final balance.
//! The machine never blocks: each operation either applies a transition and
//! queues [`SessionEvent`]s, or returns a [`SessionError`] and leaves every
//! field untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    fmt,
};
use uuid::Uuid;

use super::{
    entities::Amount,
    errors::{Operation, SessionError, SessionResult},
    events::SessionEvent,
};
use crate::{
    history::{CompletedSession, HistoryLog},
    roster::{PlayerId, Roster},
    settlement,
};

/// Selection keyword that picks the whole roster. Matched case-insensitively.
pub const SELECT_ALL: &str = "ALL";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    BuyInPending,
    PlayerSelection,
    /// Game running; balances may be submitted.
    InProgress,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "no game is running",
            Self::BuyInPending => "waiting for the buy-in",
            Self::PlayerSelection => "selecting players",
            Self::InProgress => "a game is in progress",
        };
        write!(f, "{repr}")
    }
}

/// What `begin_session` does when a game is already in progress.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Throw the unfinished game away and start over.
    #[default]
    Discard,
    /// Refuse; the game has to be abandoned explicitly first.
    Confirm,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::Discard => write!(f, "discard"),
            RestartPolicy::Confirm => write!(f, "confirm"),
        }
    }
}

/// How player selection is closed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// A single pick closes the selection.
    #[default]
    Single,
    /// Picks accumulate until `finish_selection`.
    Multi,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Single => write!(f, "single"),
            SelectionMode::Multi => write!(f, "multi"),
        }
    }
}

/// Behavior switches for one group's sessions.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionRules {
    pub restart_policy: RestartPolicy,
    pub selection_mode: SelectionMode,
}

/// The single in-flight game.
///
/// Invariant: every key of `final_balances` is an entry of `participants`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub buy_in: Option<Amount>,
    pub participants: Vec<PlayerId>,
    pub final_balances: HashMap<PlayerId, Amount>,
    /// Set once balances have been asked for.
    pub balances_requested: bool,
}

impl Session {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.buy_in.is_some()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.participants.is_empty() && self.final_balances.len() == self.participants.len()
    }

    /// Participants that haven't reported yet, in participant order.
    #[must_use]
    pub fn missing(&self) -> Vec<PlayerId> {
        self.participants
            .iter()
            .filter(|p| !self.final_balances.contains_key(*p))
            .cloned()
            .collect()
    }

    /// Participant matching `name`: exact first, then case-insensitive.
    fn resolve_participant(&self, name: &str) -> Option<&PlayerId> {
        let name = name.trim();
        self.participants
            .iter()
            .find(|p| p.as_str() == name)
            .or_else(|| self.participants.iter().find(|p| p.matches_ignore_case(name)))
    }
}

/// Result of a successful balance submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    /// Recorded; these participants still owe a balance.
    Pending { missing: Vec<PlayerId> },
    /// That was the last one. The snapshot has been appended to history.
    Completed(CompletedSession),
}

#[derive(Debug, Default)]
pub struct SessionMachine {
    phase: SessionPhase,
    session: Session,
    rules: SessionRules,
    events: VecDeque<SessionEvent>,
}

impl SessionMachine {
    #[must_use]
    pub fn new(rules: SessionRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn rules(&self) -> SessionRules {
        self.rules
    }

    pub fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.events.push_back(event);
    }

    fn wrong_phase(&self, operation: Operation) -> SessionError {
        SessionError::WrongPhase {
            operation,
            phase: self.phase,
        }
    }

    fn reset(&mut self) {
        self.session = Session::default();
        self.phase = SessionPhase::Idle;
    }

    fn discard(&mut self) {
        let participants = std::mem::take(&mut self.session.participants);
        log::warn!(
            "Discarding unfinished session ({} participants, {} balances in)",
            participants.len(),
            self.session.final_balances.len()
        );
        self.reset();
        self.emit(SessionEvent::SessionDiscarded { participants });
    }

    /// Start a new session and ask for the buy-in.
    ///
    /// Legal from `Idle`, and from `InProgress` when the restart policy
    /// allows discarding the unfinished game.
    pub fn begin_session(&mut self) -> SessionResult<()> {
        match self.phase {
            SessionPhase::Idle => {}
            SessionPhase::InProgress => match self.rules.restart_policy {
                RestartPolicy::Discard => self.discard(),
                RestartPolicy::Confirm => return Err(SessionError::SessionInProgress),
            },
            SessionPhase::BuyInPending | SessionPhase::PlayerSelection => {
                return Err(self.wrong_phase(Operation::BeginSession));
            }
        }

        self.phase = SessionPhase::BuyInPending;
        log::info!("Session started, waiting for buy-in");
        self.emit(SessionEvent::BuyInRequested);
        Ok(())
    }

    /// Throw away whatever session is open and return to `Idle`. History is
    /// not touched.
    pub fn abandon_session(&mut self) -> SessionResult<()> {
        if self.phase == SessionPhase::Idle {
            return Err(SessionError::NoActiveSession);
        }
        self.discard();
        Ok(())
    }

    /// Parse and store the buy-in, then move on to player selection.
    pub fn set_buy_in(&mut self, raw: &str, roster: &Roster) -> SessionResult<Amount> {
        if self.phase != SessionPhase::BuyInPending {
            return Err(self.wrong_phase(Operation::SetBuyIn));
        }
        let buy_in = Amount::parse_buy_in(raw)?;

        self.session = Session {
            buy_in: Some(buy_in),
            ..Session::default()
        };
        self.phase = SessionPhase::PlayerSelection;
        log::info!("Buy-in set to ${buy_in}");

        self.emit(SessionEvent::SelectionPrompt {
            buy_in,
            players: roster.list_players(),
            multi_pick: self.rules.selection_mode == SelectionMode::Multi,
        });
        Ok(buy_in)
    }

    /// Pick one player, or the whole roster with [`SELECT_ALL`].
    pub fn select_player(&mut self, pick: &str, roster: &Roster) -> SessionResult<()> {
        if self.phase != SessionPhase::PlayerSelection {
            return Err(self.wrong_phase(Operation::SelectPlayer));
        }

        let pick = pick.trim();
        if pick.eq_ignore_ascii_case(SELECT_ALL) {
            self.session.participants = roster.list_players();
            self.emit(SessionEvent::AllPlayersSelected(
                self.session.participants.clone(),
            ));
            self.close_selection();
            return Ok(());
        }

        let player = roster
            .resolve(pick)
            .cloned()
            .ok_or_else(|| SessionError::InvalidInput(format!("{pick} is not on the roster")))?;

        if !self.session.participants.contains(&player) {
            self.session.participants.push(player.clone());
        }
        self.emit(SessionEvent::PlayerPicked(player));

        if self.rules.selection_mode == SelectionMode::Single {
            self.close_selection();
        }
        Ok(())
    }

    /// Close a multi-pick selection.
    pub fn finish_selection(&mut self) -> SessionResult<()> {
        if self.phase != SessionPhase::PlayerSelection {
            return Err(self.wrong_phase(Operation::FinishSelection));
        }
        if self.session.participants.is_empty() {
            return Err(SessionError::InvalidInput(
                "pick at least one player".to_string(),
            ));
        }
        self.close_selection();
        Ok(())
    }

    fn close_selection(&mut self) {
        self.phase = SessionPhase::InProgress;
        log::info!(
            "Selection closed with {} participants",
            self.session.participants.len()
        );
        let buy_in = self.session.buy_in.unwrap_or_default();
        self.emit(SessionEvent::SessionStarted {
            buy_in,
            participants: self.session.participants.clone(),
        });
    }

    /// Ask every participant for a final balance.
    pub fn request_balances(&mut self) -> SessionResult<()> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NoActiveSession),
            SessionPhase::InProgress => {}
            _ => return Err(self.wrong_phase(Operation::RequestBalances)),
        }
        if self.session.participants.is_empty() {
            return Err(SessionError::NoActiveSession);
        }

        self.session.balances_requested = true;
        for player in self.session.participants.clone() {
            self.emit(SessionEvent::BalanceRequested(player));
        }
        Ok(())
    }

    /// Record `player`'s final balance.
    ///
    /// A repeated submission overwrites the earlier value. When the last
    /// missing balance arrives, the session is snapshotted into `history`
    /// and the machine returns to `Idle`; the check and the append happen in
    /// this one call.
    pub fn submit_balance(
        &mut self,
        player: &str,
        raw: &str,
        history: &mut HistoryLog,
    ) -> SessionResult<Submission> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NoActiveSession),
            SessionPhase::InProgress => {}
            _ => return Err(self.wrong_phase(Operation::SubmitBalance)),
        }

        let player = self
            .session
            .resolve_participant(player)
            .cloned()
            .ok_or_else(|| SessionError::NotAParticipant(player.trim().to_string()))?;
        let amount = Amount::parse_balance(raw)?;

        let updated = self
            .session
            .final_balances
            .insert(player.clone(), amount)
            .is_some();
        log::debug!("Balance for {player} recorded as ${amount}");
        self.emit(SessionEvent::BalanceRecorded {
            player,
            amount,
            updated,
        });

        if !self.session.is_complete() {
            let missing = self.session.missing();
            for player in &missing {
                self.emit(SessionEvent::BalanceRequested(player.clone()));
            }
            return Ok(Submission::Pending { missing });
        }

        let session = std::mem::take(&mut self.session);
        let completed = CompletedSession {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            buy_in: session.buy_in.unwrap_or_default(),
            participants: session.participants,
            final_balances: session.final_balances,
        };
        history.append(completed.clone());
        self.reset();
        log::info!(
            "Session {} completed with {} players, history now {}",
            completed.id,
            completed.participants.len(),
            history.len()
        );

        let settlement = settlement::settle(&completed);
        self.emit(SessionEvent::SessionCompleted {
            session: completed.clone(),
            settlement,
        });
        Ok(Submission::Completed(completed))
    }
}
