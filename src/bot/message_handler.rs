//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::dialogue::{MenuDialogue, MenuState};

use super::delivery;
use super::BotState;

/// Whether the text is the `/start` command, optionally addressed to a bot username
pub fn is_start_command(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(command) => command == "/start" || command.starts_with("/start@"),
        None => false,
    }
}

/// Handle `/start`: welcome the user and show the main menu
pub async fn start_handler(
    bot: Bot,
    msg: Message,
    dialogue: MenuDialogue,
    state: Arc<BotState>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, "Received start command");
    let menu_state = delivery::start(&bot, &state, msg.chat.id).await?;
    dialogue.update(menu_state).await?;
    Ok(())
}

/// Handle any other text message
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: MenuDialogue,
    previous: MenuState,
    state: Arc<BotState>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(
        chat_id = %msg.chat.id,
        message_length = text.len(),
        menu = previous.name(),
        "Received text message"
    );

    let menu_state = delivery::dispatch(&bot, &state, msg.chat.id, text).await?;
    dialogue.update(menu_state).await?;
    Ok(())
}
