//! Outbound notifications produced by the core.
//!
//! Every operation queues zero or more events. The transport drains them
//! after each call and renders them; each event renders to plain text on its
//! own, and [`SessionEvent::recipient`] says whether it is meant for the
//! whole group or one participant.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::Amount;
use crate::{history::CompletedSession, roster::PlayerId, settlement::Settlement};

/// Who an event is addressed to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Recipient {
    Broadcast,
    Player(PlayerId),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SessionEvent {
    /// Roster update acknowledgement. `requested` echoes every trimmed name.
    PlayersAdded {
        requested: Vec<PlayerId>,
        added: Vec<PlayerId>,
    },
    BuyInRequested,
    /// An unfinished game was thrown away by a restart or an abandon.
    SessionDiscarded { participants: Vec<PlayerId> },
    SelectionPrompt {
        buy_in: Amount,
        players: Vec<PlayerId>,
        multi_pick: bool,
    },
    PlayerPicked(PlayerId),
    AllPlayersSelected(Vec<PlayerId>),
    SessionStarted {
        buy_in: Amount,
        participants: Vec<PlayerId>,
    },
    BalanceRequested(PlayerId),
    BalanceRecorded {
        player: PlayerId,
        amount: Amount,
        updated: bool,
    },
    SessionCompleted {
        session: CompletedSession,
        settlement: Settlement,
    },
    ResetRequested,
    HistoryCleared { removed: usize },
    ResetCancelled,
}

impl SessionEvent {
    #[must_use]
    pub fn recipient(&self) -> Recipient {
        match self {
            Self::BalanceRequested(player) => Recipient::Player(player.clone()),
            Self::BalanceRecorded { player, .. } => Recipient::Player(player.clone()),
            _ => Recipient::Broadcast,
        }
    }
}

fn join(players: &[PlayerId]) -> String {
    players
        .iter()
        .map(PlayerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlayersAdded { requested, .. } => format!("Users added: {}", join(requested)),
            Self::BuyInRequested => "State the buy-in value (in dollars):".to_string(),
            Self::SessionDiscarded { participants } if participants.is_empty() => {
                "Discarded the unfinished game.".to_string()
            }
            Self::SessionDiscarded { participants } => format!(
                "Discarded the unfinished game with players: {}",
                join(participants)
            ),
            Self::SelectionPrompt { .. } => "Select your players:".to_string(),
            Self::PlayerPicked(player) => format!("Player {player} added."),
            Self::AllPlayersSelected(players) => {
                format!("All players selected: {}", join(players))
            }
            Self::SessionStarted { participants, .. } => {
                format!("Game started with players: {}", join(participants))
            }
            Self::BalanceRequested(player) => {
                format!("{player}, please enter your final balance:")
            }
            Self::BalanceRecorded {
                player,
                amount,
                updated: false,
            } => format!("{player}, your final balance is recorded as: ${amount}"),
            Self::BalanceRecorded {
                player,
                amount,
                updated: true,
            } => format!("{player}, your final balance is updated to: ${amount}"),
            Self::SessionCompleted {
                session,
                settlement,
            } => format!(
                "Final balances for the game:\n{}\n\n{settlement}",
                session.balance_table()
            ),
            Self::ResetRequested => {
                "Are you sure you want to reset all past records? Type 'yes' to confirm."
                    .to_string()
            }
            Self::HistoryCleared { .. } => "All records have been reset.".to_string(),
            Self::ResetCancelled => "Reset canceled.".to_string(),
        };
        write!(f, "{repr}")
    }
}
