//! Session module: the lifecycle of one game.
//!
//! This module provides:
//! - [`SessionMachine`]: the state machine owning the single in-flight game
//! - [`SessionEvent`]: outbound notifications queued by each operation
//! - [`SessionError`]: recoverable, user-facing errors
//! - [`Amount`]: parsing and display of buy-ins and balances
//!
//! ## Example
//!
//! ```
//! use poker_goats::{HistoryLog, Roster, SessionMachine, SessionPhase, Submission};
//!
//! let mut roster = Roster::new();
//! roster.add_players(["alice", "bob"]).unwrap();
//! let mut history = HistoryLog::new();
//!
//! let mut machine = SessionMachine::default();
//! machine.begin_session().unwrap();
//! machine.set_buy_in("50", &roster).unwrap();
//! machine.select_player("ALL", &roster).unwrap();
//! machine.submit_balance("alice", "60", &mut history).unwrap();
//! let done = machine.submit_balance("bob", "40", &mut history).unwrap();
//!
//! assert!(matches!(done, Submission::Completed(_)));
//! assert_eq!(machine.phase(), SessionPhase::Idle);
//! assert_eq!(history.len(), 1);
//! ```

pub mod entities;
pub mod errors;
pub mod events;
pub mod state_machine;

pub use entities::{Amount, AmountField};
pub use errors::{Operation, SessionError, SessionResult};
pub use events::{Recipient, SessionEvent};
pub use state_machine::{
    RestartPolicy, SELECT_ALL, SelectionMode, Session, SessionMachine, SessionPhase,
    SessionRules, Submission,
};
