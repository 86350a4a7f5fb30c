//! Durable storage for rosters and history logs.
//!
//! The active session is never persisted; only what outlives a game is. The
//! default [`MemoryStore`] keeps everything in process (lost on restart),
//! while [`JsonFileStore`] writes one JSON document per group.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{group::GroupId, history::HistoryLog, roster::Roster};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything about a group that survives a restart.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GroupSnapshot {
    pub roster: Roster,
    pub history: HistoryLog,
}

/// Load/save group snapshots.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// `None` when nothing has been saved for the group yet.
    async fn load(&self, group_id: GroupId) -> StoreResult<Option<GroupSnapshot>>;

    async fn save(&self, group_id: GroupId, snapshot: &GroupSnapshot) -> StoreResult<()>;
}
