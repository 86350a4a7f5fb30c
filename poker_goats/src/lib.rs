//! # Poker Goats
//!
//! Bookkeeping for a recurring home cash game: a roster of regulars, one game
//! at a time from buy-in to final balances, and a log of finished games.
//!
//! ## Architecture
//!
//! A game moves through four phases:
//!
//! - **Idle**: nothing running
//! - **BuyInPending**: waiting for the buy-in amount
//! - **PlayerSelection**: picking participants from the roster
//! - **InProgress**: collecting each participant's final balance
//!
//! When the last balance arrives the game is snapshotted into the history
//! log and the machine returns to idle. Clearing history goes through a
//! separate yes/no confirmation that never touches the running game.
//!
//! ## Core Modules
//!
//! - [`roster`]: known players
//! - [`session`]: the state machine, its events and errors
//! - [`history`]: completed games and the reset confirmation
//! - [`settlement`]: who owes who after a game
//! - [`group`]: per-group actors so concurrent input is applied in order
//! - [`store`]: persistence for rosters and history
//!
//! ## Example
//!
//! ```
//! use poker_goats::group::{GroupCommand, GroupState};
//! use poker_goats::SessionRules;
//!
//! let mut group = GroupState::new(1, SessionRules::default());
//! group.apply(GroupCommand::AddPlayers(vec!["alice".into(), "bob".into()]));
//! let response = group.apply(GroupCommand::BeginSession);
//! assert!(response.is_success());
//! ```

pub mod group;
pub mod history;
pub mod roster;
pub mod session;
pub mod settlement;
pub mod store;

pub use history::{CompletedSession, HistoryLog, ResetConfirmation, ResetOutcome};
pub use roster::{Player, PlayerId, Roster};
pub use session::{
    Amount, Recipient, RestartPolicy, SelectionMode, Session, SessionError, SessionEvent,
    SessionMachine, SessionPhase, SessionResult, SessionRules, Submission,
};
pub use settlement::{Settlement, Transfer, settle};
