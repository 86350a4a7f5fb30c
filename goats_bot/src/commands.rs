//! Slash-command parsing for chat input.

use std::fmt;

/// Bot commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Start,
    AddUsers,
    StartGame,
    EndGame,
    ResetAllRecords,
    History,
    AbandonGame,
    Status,
}

/// A chat message, classified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    Command(Command),
    /// Anything that isn't a slash command
    Text(String),
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Slash command the bot doesn't know.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '/{}'. Send /start to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Classify a chat message.
///
/// Group chats address commands as `/cmd@BotName`; the suffix is dropped.
/// Anything after the command word is ignored.
pub fn parse_input(input: &str) -> Result<Input, ParseError> {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Input::Text(trimmed.to_string()));
    };

    let word = rest.split_whitespace().next().unwrap_or_default();
    let name = word.split('@').next().unwrap_or_default();

    let command = match name {
        "start" | "help" => Command::Start,
        "add_users" => Command::AddUsers,
        "start_game" => Command::StartGame,
        "end_game" => Command::EndGame,
        "reset_all_records" => Command::ResetAllRecords,
        "history" => Command::History,
        "abandon_game" => Command::AbandonGame,
        "status" => Command::Status,
        _ => return Err(ParseError::UnrecognizedCommand(name.to_string())),
    };
    Ok(Input::Command(command))
}

/// Split a comma-separated user list.
pub fn split_names(text: &str) -> Vec<String> {
    text.split(',').map(|name| name.trim().to_string()).collect()
}
