//! Telegram bot tracking a recurring home poker game.
//!
//! Each chat gets its own group actor from `poker_goats`; this binary only
//! polls Telegram, routes messages and renders replies.

mod commands;
mod config;
mod dispatcher;
mod logging;
mod render;
mod telegram;

use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use poker_goats::{
    group::GroupManager,
    store::{GroupStore, JsonFileStore, MemoryStore},
};
use tokio::sync::watch;

use crate::{config::BotConfig, dispatcher::Dispatcher, telegram::TelegramClient};

const HELP: &str = "\
Run the Poker Goats Telegram bot

USAGE:
  goats_bot [FLAGS]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  TELE_API_KEY             Bot token from @BotFather (required)
  TELEGRAM_API_URL         Bot API base URL  [default: https://api.telegram.org]
  POLL_TIMEOUT_SECS        Long-poll timeout  [default: 30]
  DATA_DIR                 Keep rosters and history as JSON here  [default: in memory]
  RESTART_POLICY           discard | confirm  [default: discard]
  SELECTION_MODE           single | multi  [default: single]
  GROUP_MAILBOX_CAPACITY   Queued commands per chat  [default: 64]
  RUST_LOG                 Log filter  [default: info]
  (A .env file in the working directory is loaded first)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}. See --help", remaining);
    }

    logging::init();

    let config = BotConfig::from_env()?;
    config.validate()?;

    let store: Arc<dyn GroupStore> = match &config.data_dir {
        Some(dir) => {
            let store = JsonFileStore::new(dir.clone())
                .await
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), "Persisting rosters and history");
            Arc::new(store)
        }
        None => {
            tracing::info!("No DATA_DIR set, keeping everything in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let groups = Arc::new(GroupManager::new(store, config.group));
    let client = TelegramClient::new(&config.api_url, &config.token, config.poll_timeout)?;
    let mut dispatcher = Dispatcher::new(groups.clone());

    // Catching signals for exit.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    tracing::info!(
        restart_policy = %config.group.rules.restart_policy,
        selection_mode = %config.group.rules.selection_mode,
        "Telegram bot started"
    );
    telegram::run(&client, &mut dispatcher, shutdown_rx).await?;

    groups.shutdown().await;
    tracing::info!("Bot stopped");
    Ok(())
}
