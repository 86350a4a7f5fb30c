//! Group module: per-group state behind an async actor.
//!
//! This module implements:
//! - GroupState: one group's roster, session, history and reset flag
//! - GroupActor: async actor serializing every command for one group
//! - GroupManager: spawns and routes to actors keyed by group ID
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each group runs in its own Tokio task with an mpsc inbox. Commands are
//! applied strictly one after another, replies go back over oneshot
//! channels together with the events the command produced.
//!
//! ## Example
//!
//! ```no_run
//! use poker_goats::group::{GroupCommand, GroupConfig, GroupManager};
//! use poker_goats::store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = GroupManager::new(Arc::new(MemoryStore::new()), GroupConfig::default());
//!
//!     let response = manager
//!         .execute(-1001, GroupCommand::AddPlayers(vec!["alice".into(), "bob".into()]))
//!         .await?;
//!     for event in response.events {
//!         println!("{event}");
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::store::StoreError;

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;
pub mod state;

pub use actor::{GroupActor, GroupHandle};
pub use config::GroupConfig;
pub use manager::GroupManager;
pub use messages::{GroupCommand, GroupMessage, GroupResponse, GroupStatus, Reply};
pub use state::GroupState;

/// Group ID type (a chat ID for chat transports)
pub type GroupId = i64;

/// Errors reaching a group actor
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group {0} is closed")]
    Closed(GroupId),

    #[error("group {0} dropped the reply")]
    NoReply(GroupId),

    #[error("failed to load group: {0}")]
    Store(#[from] StoreError),
}
