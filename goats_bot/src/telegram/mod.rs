//! Telegram transport: Bot API types, an HTTP client and the polling loop.

pub mod client;
pub mod types;

use anyhow::Result;
use tokio::sync::watch;

use crate::dispatcher::{Dispatcher, Incoming, Outgoing};

pub use client::{BotApi, TelegramClient};
pub use types::{InlineKeyboardButton, InlineKeyboardMarkup, Update};

/// Pause after a failed poll before trying again
const RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(3);

/// Poll for updates and feed them through the dispatcher until `shutdown`
/// flips to true.
pub async fn run(
    client: &TelegramClient,
    dispatcher: &mut Dispatcher,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let mut offset = 0;

    loop {
        let updates = tokio::select! {
            _ = shutdown.changed() => break,
            updates = client.get_updates(offset) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Polling failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            if let Err(e) = handle_update(client, dispatcher, update).await {
                tracing::error!(error = %e, "Failed to handle update");
            }
        }
    }

    tracing::info!("Polling stopped");
    Ok(())
}

async fn handle_update<A: BotApi + ?Sized>(
    api: &A,
    dispatcher: &mut Dispatcher,
    update: Update,
) -> Result<()> {
    let (chat_id, prompt_id, incoming, callback_id) = if let Some(query) = update.callback_query
    {
        let (Some(message), Some(data)) = (query.message, query.data) else {
            answer_callback(api, &query.id).await;
            return Ok(());
        };
        (
            message.chat.id,
            Some(message.message_id),
            Incoming::Button { data },
            Some(query.id),
        )
    } else if let Some(message) = update.message {
        let Some(text) = message.text else {
            return Ok(());
        };
        let sender = message.from.and_then(|user| user.username);
        (message.chat.id, None, Incoming::Text { sender, text }, None)
    } else {
        return Ok(());
    };

    // The press is handled before the spinner is stopped, so a failed
    // acknowledgement never loses it.
    let result = deliver(api, dispatcher, chat_id, prompt_id, incoming).await;
    if let Some(id) = callback_id {
        answer_callback(api, &id).await;
    }
    result
}

async fn deliver<A: BotApi + ?Sized>(
    api: &A,
    dispatcher: &mut Dispatcher,
    chat_id: i64,
    prompt_id: Option<i64>,
    incoming: Incoming,
) -> Result<()> {
    for outgoing in dispatcher.handle(chat_id, incoming).await? {
        match (outgoing, prompt_id) {
            (Outgoing::EditPrompt { text }, Some(message_id)) => {
                api.edit_message_text(chat_id, message_id, &text).await?;
            }
            (Outgoing::EditPrompt { text }, None) => {
                api.send_message(chat_id, &text, None).await?;
            }
            (Outgoing::Send { text, keyboard }, _) => {
                api.send_message(chat_id, &text, keyboard.as_ref()).await?;
            }
        }
    }

    Ok(())
}

async fn answer_callback<A: BotApi + ?Sized>(api: &A, callback_query_id: &str) {
    if let Err(e) = api.answer_callback_query(callback_query_id).await {
        tracing::warn!(error = %e, callback_query_id, "Failed to answer callback query");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use poker_goats::{group::GroupConfig, group::GroupManager, store::MemoryStore};
    use std::sync::{Arc, Mutex};

    const CHAT: i64 = -42;

    /// Records every call; acknowledging a button press always fails.
    #[derive(Default)]
    struct FlakyApi {
        calls: Mutex<Vec<String>>,
    }

    impl FlakyApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BotApi for FlakyApi {
        async fn send_message(
            &self,
            chat_id: i64,
            text: &str,
            _keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<()> {
            self.record(format!("send {chat_id}: {text}"));
            Ok(())
        }

        async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
            self.record(format!("edit {chat_id}/{message_id}: {text}"));
            Ok(())
        }

        async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
            self.record(format!("answer {callback_query_id}"));
            anyhow::bail!("query is too old and response timeout expired")
        }
    }

    fn button_press(data: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": 10,
            "callback_query": {
                "id": "cb-1",
                "from": { "username": "alice" },
                "message": { "message_id": 77, "chat": { "id": CHAT } },
                "data": data,
            }
        }))
        .unwrap()
    }

    async fn selecting(dispatcher: &mut Dispatcher) {
        for text in ["/add_users", "alice, bob", "/start_game", "20"] {
            let incoming = Incoming::Text {
                sender: None,
                text: text.to_string(),
            };
            dispatcher.handle(CHAT, incoming).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_button_press_survives_failed_acknowledgement() {
        let mut dispatcher = Dispatcher::new(Arc::new(GroupManager::new(
            Arc::new(MemoryStore::new()),
            GroupConfig::default(),
        )));
        selecting(&mut dispatcher).await;

        let api = FlakyApi::default();
        handle_update(&api, &mut dispatcher, button_press("all"))
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                format!("edit {CHAT}/77: All players selected: alice, bob"),
                format!("send {CHAT}: Game started with players: alice, bob"),
                "answer cb-1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_stale_button_is_still_acknowledged() {
        let mut dispatcher = Dispatcher::new(Arc::new(GroupManager::new(
            Arc::new(MemoryStore::new()),
            GroupConfig::default(),
        )));
        let api = FlakyApi::default();

        let mut update = button_press("all");
        if let Some(query) = update.callback_query.as_mut() {
            query.data = None;
        }
        handle_update(&api, &mut dispatcher, update).await.unwrap();
        assert_eq!(api.calls(), vec!["answer cb-1".to_string()]);
    }
}
