//! Group manager for spawning and looking up group actors.

use super::{
    GroupError, GroupId,
    actor::{GroupActor, GroupHandle},
    config::GroupConfig,
    messages::{GroupCommand, GroupResponse},
};
use crate::store::GroupStore;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Routes commands to per-group actors, spawning them on first use.
pub struct GroupManager {
    /// Backing store for rosters and history
    store: Arc<dyn GroupStore>,

    /// Settings applied to every spawned group
    config: GroupConfig,

    /// Active group handles
    groups: Arc<RwLock<HashMap<GroupId, GroupHandle>>>,
}

impl GroupManager {
    /// Create a new group manager
    pub fn new(store: Arc<dyn GroupStore>, config: GroupConfig) -> Self {
        Self {
            store,
            config,
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Get the handle for a group, loading and spawning its actor if needed.
    ///
    /// A cached handle whose actor has stopped is dropped and the group is
    /// reloaded from the store.
    pub async fn group(&self, group_id: GroupId) -> Result<GroupHandle, GroupError> {
        if let Some(handle) = self.groups.read().await.get(&group_id) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
        }

        let mut groups = self.groups.write().await;
        // Someone else may have spawned it while we waited for the lock.
        match groups.get(&group_id) {
            Some(handle) if !handle.is_closed() => return Ok(handle.clone()),
            Some(_) => {
                groups.remove(&group_id);
                log::warn!("Group {} actor has stopped, respawning", group_id);
            }
            None => {}
        }

        let snapshot = self.store.load(group_id).await?.unwrap_or_default();
        let (actor, handle) =
            GroupActor::new(group_id, self.config, snapshot, self.store.clone());
        groups.insert(group_id, handle.clone());
        drop(groups);

        tokio::spawn(actor.run());
        log::info!("Spawned group {}", group_id);

        Ok(handle)
    }

    /// Run a command against a group.
    ///
    /// A command that could not be delivered is retried once against a
    /// freshly spawned actor. A command whose actor died before replying is
    /// not retried, but the dead handle is evicted.
    pub async fn execute(
        &self,
        group_id: GroupId,
        command: GroupCommand,
    ) -> Result<GroupResponse, GroupError> {
        let handle = self.group(group_id).await?;
        match handle.execute(command.clone()).await {
            Err(GroupError::Closed(_)) => {
                self.evict(&handle).await;
                self.group(group_id).await?.execute(command).await
            }
            Err(e @ GroupError::NoReply(_)) => {
                self.evict(&handle).await;
                Err(e)
            }
            result => result,
        }
    }

    /// Forget a handle, unless it has already been replaced.
    async fn evict(&self, stale: &GroupHandle) {
        let mut groups = self.groups.write().await;
        if groups
            .get(&stale.group_id())
            .is_some_and(|current| current.same_actor(stale))
        {
            groups.remove(&stale.group_id());
            log::warn!("Group {} actor is unreachable, evicted", stale.group_id());
        }
    }

    /// Stop a group's actor. Its roster and history stay in the store.
    pub async fn close_group(&self, group_id: GroupId) -> Result<(), GroupError> {
        let handle = self.groups.write().await.remove(&group_id);
        if let Some(handle) = handle {
            handle.close().await?;
            log::info!("Closed group {}", group_id);
        }
        Ok(())
    }

    /// Stop every group actor
    pub async fn shutdown(&self) {
        let handles: Vec<GroupHandle> = self.groups.write().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            if let Err(e) = handle.close().await {
                log::warn!("Group {} did not close cleanly: {}", handle.group_id(), e);
            }
        }
    }

    /// Get active group count
    pub async fn active_group_count(&self) -> usize {
        self.groups.read().await.len()
    }
}
