//! HTTP client for the Telegram Bot API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use super::types::{
    AnswerCallbackQuery, ApiResponse, EditMessageText, GetUpdates, InlineKeyboardMarkup, Message,
    SendMessage, Update,
};

/// Extra time on top of the long-poll timeout before the HTTP request gives up
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token
pub struct TelegramClient {
    base_url: String,
    client: reqwest::Client,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// Create a new client
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(poll_timeout + REQUEST_GRACE)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            client,
            poll_timeout,
        })
    }

    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send {method} request"))?;

        let status = response.status();
        let body: ApiResponse<Res> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {method} response ({status})"))?;

        if !body.ok {
            anyhow::bail!(
                "{} failed: {}",
                method,
                body.description.unwrap_or_else(|| status.to_string())
            );
        }

        body.result
            .with_context(|| format!("{method} returned no result"))
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let request = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message", "callback_query"],
        };
        self.call("getUpdates", &request).await
    }

}

/// The Bot API calls made while answering an update.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Post a message to a chat, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Replace the text of a message the bot sent, dropping its keyboard
    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;

    /// Stop the client-side spinner on a pressed button
    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()>;
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        let request = SendMessage {
            chat_id,
            text,
            reply_markup: keyboard,
        };
        let _: Message = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        let request = EditMessageText {
            chat_id,
            message_id,
            text,
        };
        // Returns the edited message, which nothing needs.
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        let request = AnswerCallbackQuery { callback_query_id };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}
