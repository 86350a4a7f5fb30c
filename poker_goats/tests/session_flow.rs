//! Integration tests for a full game from roster to history.
//!
//! Drives the session machine the way a chat front end would and checks the
//! notifications, the history log and the settlement at each step.

use poker_goats::{
    Amount, HistoryLog, PlayerId, RestartPolicy, Roster, SelectionMode, SessionError,
    SessionEvent, SessionMachine, SessionPhase, SessionRules, Submission,
    history::ResetConfirmation, history::ResetOutcome,
};

fn roster(names: &[&str]) -> Roster {
    let mut roster = Roster::new();
    roster.add_players(names.iter().copied()).unwrap();
    roster
}

fn ids(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|n| PlayerId::from(*n)).collect()
}

/// Begin, set the buy-in and select everybody.
fn started(machine: &mut SessionMachine, roster: &Roster, buy_in: &str) {
    machine.begin_session().unwrap();
    machine.set_buy_in(buy_in, roster).unwrap();
    machine.select_player("ALL", roster).unwrap();
    machine.drain_events();
}

#[test]
fn test_two_player_game_completes_into_history() {
    let roster = roster(&["alice", "bob"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();

    machine.begin_session().unwrap();
    assert_eq!(machine.phase(), SessionPhase::BuyInPending);
    assert_eq!(
        machine.drain_events().into_iter().collect::<Vec<_>>(),
        vec![SessionEvent::BuyInRequested]
    );

    let buy_in = machine.set_buy_in("50", &roster).unwrap();
    assert_eq!(buy_in, Amount::from(50.0));
    assert_eq!(machine.phase(), SessionPhase::PlayerSelection);

    machine.select_player("ALL", &roster).unwrap();
    assert_eq!(machine.phase(), SessionPhase::InProgress);
    assert_eq!(machine.session().participants, ids(&["alice", "bob"]));

    machine.request_balances().unwrap();
    machine.drain_events();

    let first = machine.submit_balance("alice", "60", &mut history).unwrap();
    assert_eq!(
        first,
        Submission::Pending {
            missing: ids(&["bob"])
        }
    );
    assert!(history.is_empty());

    let done = machine.submit_balance("bob", "40", &mut history).unwrap();
    let Submission::Completed(completed) = done else {
        panic!("expected the game to complete");
    };

    assert_eq!(completed.balance_table(), "alice: $60.0\nbob: $40.0");
    assert_eq!(completed.buy_in, Amount::from(50.0));
    assert_eq!(history.len(), 1);
    assert_eq!(history.last(), Some(&completed));

    assert_eq!(machine.phase(), SessionPhase::Idle);
    assert_eq!(machine.session().buy_in, None);
    assert!(machine.session().participants.is_empty());
    assert!(machine.session().final_balances.is_empty());

    let events: Vec<_> = machine.drain_events().into();
    let Some(SessionEvent::SessionCompleted { settlement, .. }) = events.last() else {
        panic!("expected a completion notice, got {events:?}");
    };
    assert!(settlement.is_balanced());
    assert_eq!(settlement.transfers.len(), 1);
    assert_eq!(settlement.transfers[0].to_string(), "bob pays alice $10.0");
}

#[test]
fn test_outsider_cannot_submit() {
    let roster = roster(&["alice", "bob"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();
    started(&mut machine, &roster, "20");

    let err = machine.submit_balance("carol", "10", &mut history).unwrap_err();
    assert_eq!(err, SessionError::NotAParticipant("carol".to_string()));
    assert!(machine.session().final_balances.is_empty());
    assert!(machine.drain_events().is_empty());
}

#[test]
fn test_non_numeric_input_is_recoverable() {
    let roster = roster(&["alice"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();

    machine.begin_session().unwrap();
    assert!(matches!(
        machine.set_buy_in("fifty", &roster),
        Err(SessionError::Validation { .. })
    ));
    assert_eq!(machine.phase(), SessionPhase::BuyInPending);

    machine.set_buy_in("12.5", &roster).unwrap();
    machine.select_player("alice", &roster).unwrap();
    assert!(matches!(
        machine.submit_balance("alice", "lots", &mut history),
        Err(SessionError::Validation { .. })
    ));
    assert_eq!(machine.phase(), SessionPhase::InProgress);

    let done = machine.submit_balance("alice", "12.5", &mut history).unwrap();
    assert!(matches!(done, Submission::Completed(_)));
}

#[test]
fn test_extreme_balance_is_rejected_and_game_stays_open() {
    let roster = roster(&["alice", "bob"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();
    started(&mut machine, &roster, "20");

    machine.submit_balance("alice", "20", &mut history).unwrap();
    for raw in ["1e17", "-1e17"] {
        assert!(matches!(
            machine.submit_balance("bob", raw, &mut history),
            Err(SessionError::Validation { .. })
        ));
    }
    assert_eq!(machine.phase(), SessionPhase::InProgress);
    assert!(history.is_empty());

    let done = machine.submit_balance("bob", "20", &mut history).unwrap();
    assert!(matches!(done, Submission::Completed(_)));
}

#[test]
fn test_resubmission_overwrites_until_complete() {
    let roster = roster(&["alice", "bob"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();
    started(&mut machine, &roster, "30");

    machine.submit_balance("alice", "10", &mut history).unwrap();
    machine.submit_balance("Alice", "15", &mut history).unwrap();
    assert_eq!(
        machine.session().final_balances.get("alice"),
        Some(&Amount::from(15.0))
    );

    let Submission::Completed(completed) =
        machine.submit_balance("bob", "45", &mut history).unwrap()
    else {
        panic!("expected the game to complete");
    };
    assert_eq!(completed.balance_table(), "alice: $15.0\nbob: $45.0");
}

#[test]
fn test_restart_discards_unfinished_game_by_default() {
    let roster = roster(&["alice", "bob"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();
    started(&mut machine, &roster, "30");
    machine.submit_balance("alice", "10", &mut history).unwrap();
    machine.drain_events();

    machine.begin_session().unwrap();
    assert_eq!(machine.phase(), SessionPhase::BuyInPending);
    assert!(machine.session().final_balances.is_empty());
    assert!(history.is_empty());

    let events: Vec<_> = machine.drain_events().into();
    assert_eq!(
        events,
        vec![
            SessionEvent::SessionDiscarded {
                participants: ids(&["alice", "bob"])
            },
            SessionEvent::BuyInRequested,
        ]
    );
}

#[test]
fn test_confirm_policy_requires_abandon() {
    let roster = roster(&["alice"]);
    let mut machine = SessionMachine::new(SessionRules {
        restart_policy: RestartPolicy::Confirm,
        selection_mode: SelectionMode::Single,
    });
    started(&mut machine, &roster, "5");

    assert_eq!(machine.begin_session(), Err(SessionError::SessionInProgress));
    assert_eq!(machine.phase(), SessionPhase::InProgress);

    machine.abandon_session().unwrap();
    assert_eq!(machine.phase(), SessionPhase::Idle);
    machine.begin_session().unwrap();
}

#[test]
fn test_multi_pick_selection() {
    let roster = roster(&["alice", "bob", "carol"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::new(SessionRules {
        restart_policy: RestartPolicy::Discard,
        selection_mode: SelectionMode::Multi,
    });

    machine.begin_session().unwrap();
    machine.set_buy_in("10", &roster).unwrap();
    assert!(matches!(
        machine.finish_selection(),
        Err(SessionError::InvalidInput(_))
    ));

    machine.select_player("carol", &roster).unwrap();
    machine.select_player("alice", &roster).unwrap();
    assert_eq!(machine.phase(), SessionPhase::PlayerSelection);
    machine.finish_selection().unwrap();

    assert_eq!(machine.session().participants, ids(&["carol", "alice"]));
    machine.submit_balance("carol", "0", &mut history).unwrap();
    let Submission::Completed(completed) =
        machine.submit_balance("alice", "20", &mut history).unwrap()
    else {
        panic!("expected the game to complete");
    };
    assert_eq!(completed.balance_table(), "carol: $0.0\nalice: $20.0");
}

#[test]
fn test_reset_clears_history_only_on_yes() {
    let roster = roster(&["alice"]);
    let mut history = HistoryLog::new();
    let mut machine = SessionMachine::default();
    for _ in 0..2 {
        started(&mut machine, &roster, "10");
        machine.submit_balance("alice", "10", &mut history).unwrap();
    }
    assert_eq!(history.len(), 2);

    let mut reset = ResetConfirmation::new();
    assert_eq!(
        reset.confirm("yes", &mut history),
        Err(SessionError::NoPendingReset)
    );

    reset.request();
    assert_eq!(
        reset.confirm("no thanks", &mut history),
        Ok(ResetOutcome::Cancelled)
    );
    assert_eq!(history.len(), 2);

    reset.request();
    assert_eq!(
        reset.confirm("  YES ", &mut history),
        Ok(ResetOutcome::Cleared(2))
    );
    assert!(history.is_empty());
    assert!(!reset.is_pending());
}
