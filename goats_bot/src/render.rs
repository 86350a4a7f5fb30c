//! Turning session events, errors and summaries into chat messages.

use poker_goats::{
    CompletedSession, SessionError, SessionEvent, session::AmountField, group::GroupStatus,
    settle,
};

use crate::dispatcher::Outgoing;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback data for the "Select All" button
pub const SELECT_ALL_DATA: &str = "all";
/// Callback data for the "Done" button in multi-pick mode
pub const DONE_DATA: &str = "done";
/// Prefix of per-player callback data
pub const PICK_PREFIX: &str = "pick:";

/// Telegram rejects callback data longer than this many bytes.
const MAX_CALLBACK_DATA: usize = 64;

pub const HELP: &str = "\
Welcome to the Poker Goats! Here's how to use it:

1. If your group is using this bot for the very first time, use /add_users to add all potential players.
2. Once players are added, use /start_game to begin a game.
   - You will be prompted to enter the buy-in amount and select players.
3. After the game, use /end_game to collect final balances from each player.
   - The bot will display the final balances and who owes who.
4. To clear all records, use /reset_all_records.

Other commands:
/history - list finished games
/status - show the game in progress
/abandon_game - drop the game in progress without recording it

Have fun!";

pub const ADD_USERS_PROMPT: &str = "Please list the users to add (comma-separated):";

pub const NEEDS_USERNAME: &str =
    "You need a Telegram username to report a balance. Set one in your profile and try again.";

/// Render the events of one command, in order.
///
/// `from_button` says whether they were caused by a selection button press,
/// in which case a closing pick replaces the prompt instead of adding a
/// new message.
pub fn events(events: &[SessionEvent], from_button: bool) -> Vec<Outgoing> {
    let closes_selection = events
        .iter()
        .any(|e| matches!(e, SessionEvent::SessionStarted { .. }));

    events
        .iter()
        .map(|event| match event {
            SessionEvent::SelectionPrompt {
                players,
                multi_pick,
                ..
            } => Outgoing::Send {
                text: event.to_string(),
                keyboard: Some(selection_keyboard(players, *multi_pick)),
            },
            SessionEvent::PlayerPicked(_) | SessionEvent::AllPlayersSelected(_)
                if from_button && closes_selection =>
            {
                Outgoing::EditPrompt {
                    text: event.to_string(),
                }
            }
            _ => Outgoing::text(event.to_string()),
        })
        .collect()
}

/// "Select All", one button per player, and "Done" when picks accumulate.
pub fn selection_keyboard<P: AsRef<str>>(players: &[P], multi_pick: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![button("Select All", SELECT_ALL_DATA)]];

    for player in players {
        let player = player.as_ref();
        let data = format!("{PICK_PREFIX}{player}");
        if data.len() > MAX_CALLBACK_DATA {
            tracing::warn!(player, "Name too long for a selection button, skipping");
            continue;
        }
        rows.push(vec![button(player, &data)]);
    }

    if multi_pick {
        rows.push(vec![button("Done", DONE_DATA)]);
    }

    InlineKeyboardMarkup {
        inline_keyboard: rows,
    }
}

fn button(text: &str, data: &str) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: text.to_string(),
        callback_data: data.to_string(),
    }
}

/// User-facing text for a rejected command.
pub fn error(err: &SessionError) -> String {
    match err {
        SessionError::Validation {
            field: AmountField::BuyIn,
            ..
        } => "Please enter a valid buy-in amount (numeric).".to_string(),
        SessionError::Validation {
            field: AmountField::Balance,
            ..
        } => "Invalid balance entered. Please enter a valid numeric balance.".to_string(),
        SessionError::NotAParticipant(_) => "You are not part of this game.".to_string(),
        SessionError::NoActiveSession => {
            "No game in progress. Use /start_game to begin.".to_string()
        }
        SessionError::SessionInProgress => {
            "A game is already in progress. Use /abandon_game to drop it first.".to_string()
        }
        SessionError::NoPendingReset => {
            "Nothing to confirm. Use /reset_all_records first.".to_string()
        }
        SessionError::InvalidInput(_) | SessionError::WrongPhase { .. } => sentence(err),
    }
}

/// Capitalize and terminate an error's display text.
fn sentence(err: &SessionError) -> String {
    let text = err.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => text,
    }
}

/// One short block per finished game.
pub fn history(sessions: &[CompletedSession]) -> String {
    if sessions.is_empty() {
        return "No games recorded yet.".to_string();
    }

    let blocks: Vec<String> = sessions
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let settlement = settle(session);
            format!(
                "Game {} ({}), buy-in ${}:\n{}\n{}",
                i + 1,
                session.completed_at.format("%Y-%m-%d %H:%M UTC"),
                session.buy_in,
                session.balance_table(),
                settlement
            )
        })
        .collect();
    blocks.join("\n\n")
}

pub fn status(status: &GroupStatus) -> String {
    let mut lines = vec![format!("Status: {}", status.phase)];

    if let Some(buy_in) = status.buy_in {
        lines.push(format!("Buy-in: ${buy_in}"));
    }
    if !status.participants.is_empty() {
        lines.push(format!("Players: {}", join(&status.participants)));
    }
    if !status.missing.is_empty() {
        lines.push(format!("Waiting on: {}", join(&status.missing)));
    }
    lines.push(format!(
        "{} players on the roster, {} games recorded",
        status.roster_size, status.history_len
    ));
    if status.reset_pending {
        lines.push("A history reset is waiting for confirmation.".to_string());
    }

    lines.join("\n")
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_goats::{Amount, PlayerId, SessionPhase};

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    #[test]
    fn test_selection_prompt_gets_keyboard() {
        let rendered = events(
            &[SessionEvent::SelectionPrompt {
                buy_in: Amount::from(20.0),
                players: ids(&["alice", "bob"]),
                multi_pick: false,
            }],
            false,
        );

        let [Outgoing::Send { text, keyboard }] = rendered.as_slice() else {
            panic!("expected one message, got {rendered:?}");
        };
        assert_eq!(text, "Select your players:");
        let rows = &keyboard.as_ref().unwrap().inline_keyboard;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].callback_data, "all");
        assert_eq!(rows[2][0].text, "bob");
        assert_eq!(rows[2][0].callback_data, "pick:bob");
    }

    #[test]
    fn test_multi_pick_keyboard_has_done() {
        let keyboard = selection_keyboard(&["alice"], true);
        let last = keyboard.inline_keyboard.last().unwrap();
        assert_eq!(last[0].callback_data, DONE_DATA);
    }

    #[test]
    fn test_long_names_are_left_off_the_keyboard() {
        let long = "x".repeat(70);
        let keyboard = selection_keyboard(&[long.as_str(), "bob"], false);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
    }

    #[test]
    fn test_closing_pick_edits_prompt() {
        let rendered = events(
            &[
                SessionEvent::PlayerPicked(PlayerId::from("alice")),
                SessionEvent::SessionStarted {
                    buy_in: Amount::from(20.0),
                    participants: ids(&["alice"]),
                },
            ],
            true,
        );
        assert_eq!(
            rendered,
            vec![
                Outgoing::EditPrompt {
                    text: "Player alice added.".to_string()
                },
                Outgoing::text("Game started with players: alice"),
            ]
        );
    }

    #[test]
    fn test_open_pick_is_sent_not_edited() {
        let rendered = events(&[SessionEvent::PlayerPicked(PlayerId::from("alice"))], true);
        assert_eq!(rendered, vec![Outgoing::text("Player alice added.")]);
    }

    #[test]
    fn test_error_phrases() {
        let err = SessionError::Validation {
            field: AmountField::BuyIn,
            input: "ten".to_string(),
        };
        assert_eq!(error(&err), "Please enter a valid buy-in amount (numeric).");
        assert_eq!(
            error(&SessionError::NotAParticipant("carol".to_string())),
            "You are not part of this game."
        );
        assert_eq!(
            error(&SessionError::InvalidInput("pick at least one player".to_string())),
            "Invalid input: pick at least one player."
        );
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history(&[]), "No games recorded yet.");
    }

    #[test]
    fn test_status_lists_missing_players() {
        let text = status(&GroupStatus {
            group_id: 1,
            phase: SessionPhase::InProgress,
            buy_in: Some(Amount::from(20.0)),
            participants: ids(&["alice", "bob"]),
            missing: ids(&["bob"]),
            balances_requested: true,
            roster_size: 3,
            history_len: 0,
            reset_pending: false,
        });
        assert_eq!(
            text,
            "Status: a game is in progress\n\
             Buy-in: $20.0\n\
             Players: alice, bob\n\
             Waiting on: bob\n\
             3 players on the roster, 0 games recorded"
        );
    }
}
