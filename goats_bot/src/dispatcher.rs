//! Routes chat input to group commands and renders the replies.
//!
//! The dispatcher remembers, per chat, which free-text answer it is waiting
//! for (a user list, the buy-in, balances, or a reset confirmation) and
//! turns each incoming message or button press into one [`GroupCommand`].

use poker_goats::{
    Submission,
    group::{GroupCommand, GroupError, GroupId, GroupManager, GroupResponse, Reply},
};
use std::{collections::HashMap, sync::Arc};

use crate::{
    commands::{self, Command, Input},
    render,
    telegram::InlineKeyboardMarkup,
};

/// Something that arrived from a chat.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Incoming {
    /// A typed message. `sender` is the author's username, if they have one.
    Text { sender: Option<String>, text: String },
    /// An inline keyboard button press
    Button { data: String },
}

/// Something to post back to the chat.
#[derive(Clone, Debug, PartialEq)]
pub enum Outgoing {
    Send {
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    /// Replace the text of the message holding the pressed button
    EditPrompt { text: String },
}

impl Outgoing {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Send {
            text: text.into(),
            keyboard: None,
        }
    }
}

/// Which free-text answer a chat owes the bot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Awaiting {
    #[default]
    Nothing,
    AddUsers,
    BuyIn,
    Balances,
    ConfirmReset,
}

pub struct Dispatcher {
    groups: Arc<GroupManager>,
    awaiting: HashMap<GroupId, Awaiting>,
}

impl Dispatcher {
    pub fn new(groups: Arc<GroupManager>) -> Self {
        Self {
            groups,
            awaiting: HashMap::new(),
        }
    }

    #[must_use]
    pub fn awaiting(&self, chat_id: GroupId) -> Awaiting {
        self.awaiting.get(&chat_id).copied().unwrap_or_default()
    }

    fn set_awaiting(&mut self, chat_id: GroupId, awaiting: Awaiting) {
        if awaiting == Awaiting::Nothing {
            self.awaiting.remove(&chat_id);
        } else {
            self.awaiting.insert(chat_id, awaiting);
        }
    }

    /// Handle one incoming message or button press for a chat.
    ///
    /// # Errors
    ///
    /// Fails only when the chat's group actor can't be reached. Rejected
    /// commands come back as messages explaining what went wrong.
    pub async fn handle(
        &mut self,
        chat_id: GroupId,
        incoming: Incoming,
    ) -> Result<Vec<Outgoing>, GroupError> {
        match incoming {
            Incoming::Button { data } => self.on_button(chat_id, &data).await,
            Incoming::Text { sender, text } => match commands::parse_input(&text) {
                Ok(Input::Command(command)) => {
                    tracing::debug!(chat_id, ?command, "Command received");
                    self.on_command(chat_id, command).await
                }
                Ok(Input::Text(text)) => self.on_text(chat_id, sender, text).await,
                Err(e) => Ok(vec![Outgoing::text(e.to_string())]),
            },
        }
    }

    async fn on_command(
        &mut self,
        chat_id: GroupId,
        command: Command,
    ) -> Result<Vec<Outgoing>, GroupError> {
        let (group_command, next) = match command {
            Command::Start => return Ok(vec![Outgoing::text(render::HELP)]),
            Command::AddUsers => {
                self.set_awaiting(chat_id, Awaiting::AddUsers);
                return Ok(vec![Outgoing::text(render::ADD_USERS_PROMPT)]);
            }
            Command::StartGame => (GroupCommand::BeginSession, Awaiting::BuyIn),
            Command::EndGame => (GroupCommand::RequestBalances, Awaiting::Balances),
            Command::ResetAllRecords => (GroupCommand::RequestReset, Awaiting::ConfirmReset),
            Command::AbandonGame => (GroupCommand::AbandonSession, Awaiting::Nothing),
            Command::History => {
                let response = self.groups.execute(chat_id, GroupCommand::ListHistory).await?;
                let text = match response.result {
                    Ok(Reply::History(sessions)) => render::history(&sessions),
                    Ok(_) => String::new(),
                    Err(e) => render::error(&e),
                };
                return Ok(vec![Outgoing::text(text)]);
            }
            Command::Status => {
                let response = self.groups.execute(chat_id, GroupCommand::GetStatus).await?;
                let text = match response.result {
                    Ok(Reply::Status(status)) => render::status(&status),
                    Ok(_) => String::new(),
                    Err(e) => render::error(&e),
                };
                return Ok(vec![Outgoing::text(text)]);
            }
        };

        let response = self.groups.execute(chat_id, group_command).await?;
        if response.is_success() {
            self.set_awaiting(chat_id, next);
        }
        Ok(reply(response, false))
    }

    async fn on_text(
        &mut self,
        chat_id: GroupId,
        sender: Option<String>,
        text: String,
    ) -> Result<Vec<Outgoing>, GroupError> {
        let command = match self.awaiting(chat_id) {
            Awaiting::Nothing => return Ok(Vec::new()),
            Awaiting::AddUsers => GroupCommand::AddPlayers(commands::split_names(&text)),
            Awaiting::BuyIn => GroupCommand::SetBuyIn(text),
            Awaiting::ConfirmReset => GroupCommand::ConfirmReset(text),
            Awaiting::Balances => {
                let Some(player) = sender else {
                    return Ok(vec![Outgoing::text(render::NEEDS_USERNAME)]);
                };
                GroupCommand::SubmitBalance { player, text }
            }
        };

        let response = self.groups.execute(chat_id, command).await?;
        let done = match &response.result {
            Ok(Reply::Submission(Submission::Pending { .. })) => false,
            Ok(_) => true,
            // A declined reset answer still ends the question.
            Err(_) => self.awaiting(chat_id) == Awaiting::ConfirmReset,
        };
        if done {
            self.set_awaiting(chat_id, Awaiting::Nothing);
        }

        Ok(reply(response, false))
    }

    async fn on_button(&mut self, chat_id: GroupId, data: &str) -> Result<Vec<Outgoing>, GroupError> {
        let command = if data == render::SELECT_ALL_DATA {
            GroupCommand::SelectPlayer(poker_goats::session::SELECT_ALL.to_string())
        } else if data == render::DONE_DATA {
            GroupCommand::FinishSelection
        } else if let Some(player) = data.strip_prefix(render::PICK_PREFIX) {
            GroupCommand::SelectPlayer(player.to_string())
        } else {
            tracing::debug!(chat_id, data, "Ignoring unknown button");
            return Ok(Vec::new());
        };

        let response = self.groups.execute(chat_id, command).await?;
        Ok(reply(response, true))
    }
}

/// Events first, then the rejection message if the command failed.
fn reply(response: GroupResponse, from_button: bool) -> Vec<Outgoing> {
    let mut out = render::events(&response.events, from_button);
    if let Err(e) = &response.result {
        out.push(Outgoing::text(render::error(e)));
    }
    out
}
