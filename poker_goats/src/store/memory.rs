//! In-process store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{GroupSnapshot, GroupStore, StoreResult};
use crate::group::GroupId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: RwLock<HashMap<GroupId, GroupSnapshot>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn load(&self, group_id: GroupId) -> StoreResult<Option<GroupSnapshot>> {
        Ok(self.groups.read().await.get(&group_id).cloned())
    }

    async fn save(&self, group_id: GroupId, snapshot: &GroupSnapshot) -> StoreResult<()> {
        self.groups.write().await.insert(group_id, snapshot.clone());
        Ok(())
    }
}
