//! Group actor: one task per group, one message at a time.
//!
//! Every command for a group goes through the actor's inbox, so a balance
//! submission and its completion check can never interleave with another
//! submission for the same session.

use super::{
    GroupError, GroupId,
    config::GroupConfig,
    messages::{GroupCommand, GroupMessage, GroupResponse},
    state::GroupState,
};
use crate::store::{GroupSnapshot, GroupStore};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Group actor handle for sending messages
#[derive(Clone, Debug)]
pub struct GroupHandle {
    sender: mpsc::Sender<GroupMessage>,
    group_id: GroupId,
}

impl GroupHandle {
    /// Create a new group handle
    pub fn new(sender: mpsc::Sender<GroupMessage>, group_id: GroupId) -> Self {
        Self { sender, group_id }
    }

    /// Get group ID
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Whether both handles talk to the same actor
    pub fn same_actor(&self, other: &GroupHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Send a message to the group
    pub async fn send(&self, message: GroupMessage) -> Result<(), GroupError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GroupError::Closed(self.group_id))
    }

    /// Run a command and wait for its response
    pub async fn execute(&self, command: GroupCommand) -> Result<GroupResponse, GroupError> {
        let (tx, rx) = oneshot::channel();
        self.send(GroupMessage::Command {
            command,
            response: tx,
        })
        .await?;
        rx.await.map_err(|_| GroupError::NoReply(self.group_id))
    }

    /// Ask the actor to stop and wait until its inbox is gone
    pub async fn close(&self) -> Result<(), GroupError> {
        let (tx, rx) = oneshot::channel();
        self.send(GroupMessage::Close { response: tx }).await?;
        rx.await.map_err(|_| GroupError::NoReply(self.group_id))?;
        self.sender.closed().await;
        Ok(())
    }
}

/// Group actor owning one group's state
pub struct GroupActor {
    state: GroupState,

    /// Message inbox
    inbox: mpsc::Receiver<GroupMessage>,

    /// Where roster and history are persisted after they change
    store: Arc<dyn GroupStore>,
}

impl GroupActor {
    /// Create a new group actor
    ///
    /// # Arguments
    ///
    /// * `id` - Group ID
    /// * `config` - Group configuration
    /// * `snapshot` - Previously persisted roster and history
    /// * `store` - Store to persist changes into
    ///
    /// # Returns
    ///
    /// * `(GroupActor, GroupHandle)` - Actor and handle for sending messages
    pub fn new(
        id: GroupId,
        config: GroupConfig,
        snapshot: GroupSnapshot,
        store: Arc<dyn GroupStore>,
    ) -> (Self, GroupHandle) {
        let (sender, inbox) = mpsc::channel(config.mailbox_capacity.max(1));

        let actor = Self {
            state: GroupState::restore(id, config.rules, snapshot),
            inbox,
            store,
        };

        (actor, GroupHandle::new(sender, id))
    }

    /// Run the group actor event loop
    pub async fn run(mut self) {
        let id = self.state.id();
        log::info!(
            "Group {} starting with {} players and {} past sessions",
            id,
            self.state.roster().len(),
            self.state.history().len()
        );

        while let Some(message) = self.inbox.recv().await {
            match message {
                GroupMessage::Command { command, response } => {
                    let result = self.handle_command(command).await;
                    let _ = response.send(result);
                }
                GroupMessage::Close { response } => {
                    let _ = response.send(());
                    break;
                }
            }
        }

        log::info!("Group {} stopped", id);
    }

    async fn handle_command(&mut self, command: GroupCommand) -> GroupResponse {
        let response = self.state.apply(command);

        if response.changes_durable_state() {
            // The in-memory state is authoritative; a failed save is logged
            // and retried implicitly by the next durable change.
            if let Err(e) = self.store.save(self.state.id(), &self.state.snapshot()).await {
                log::error!("Group {}: failed to persist state: {}", self.state.id(), e);
            }
        }

        response
    }
}
