//! Group configuration.

use serde::{Deserialize, Serialize};

use crate::session::SessionRules;

/// Per-group settings applied when a group's actor is spawned.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupConfig {
    pub rules: SessionRules,

    /// Capacity of each actor's message inbox
    pub mailbox_capacity: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            rules: SessionRules::default(),
            mailbox_capacity: 64,
        }
    }
}

impl GroupConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mailbox_capacity == 0 {
            return Err("Mailbox capacity must be at least 1".to_string());
        }
        Ok(())
    }
}
