//! Bot configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use poker_goats::{RestartPolicy, SelectionMode, SessionRules, group::GroupConfig};
use std::{path::PathBuf, str::FromStr, time::Duration};

/// Complete bot configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token (required)
    pub token: String,
    /// Bot API base URL
    pub api_url: String,
    /// Long-poll timeout for getUpdates
    pub poll_timeout: Duration,
    /// Where to keep rosters and history; in memory when unset
    pub data_dir: Option<PathBuf>,
    /// Rules and mailbox size for every group
    pub group: GroupConfig,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TELE_API_KEY").ok_or_else(|| ConfigError::MissingRequired {
            var: "TELE_API_KEY".to_string(),
            hint: "Create a bot with @BotFather and copy its token".to_string(),
        })?;

        let api_url =
            lookup("TELEGRAM_API_URL").unwrap_or_else(|| "https://api.telegram.org".to_string());

        let poll_timeout = Duration::from_secs(parse_or(&lookup, "POLL_TIMEOUT_SECS", 30)?);

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let restart_policy = match lookup("RESTART_POLICY").as_deref().map(str::trim) {
            None | Some("discard") => RestartPolicy::Discard,
            Some("confirm") => RestartPolicy::Confirm,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "RESTART_POLICY".to_string(),
                    reason: format!("expected 'discard' or 'confirm', got '{other}'"),
                });
            }
        };

        let selection_mode = match lookup("SELECTION_MODE").as_deref().map(str::trim) {
            None | Some("single") => SelectionMode::Single,
            Some("multi") => SelectionMode::Multi,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SELECTION_MODE".to_string(),
                    reason: format!("expected 'single' or 'multi', got '{other}'"),
                });
            }
        };

        let group = GroupConfig {
            rules: SessionRules {
                restart_policy,
                selection_mode,
            },
            mailbox_capacity: parse_or(&lookup, "GROUP_MAILBOX_CAPACITY", 64)?,
        };

        Ok(Self {
            token,
            api_url,
            poll_timeout,
            data_dir,
            group,
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "TELE_API_KEY".to_string(),
                reason: "token is empty".to_string(),
            });
        }

        if self.poll_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "POLL_TIMEOUT_SECS".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        self.group
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "GROUP_MAILBOX_CAPACITY".to_string(),
                reason,
            })
    }
}

/// Parse a variable, falling back to `default` when it is unset
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            reason: format!("'{raw}' is not a valid number"),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {var}. {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
