//! Transport seam between delivery actions and Telegram.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, KeyboardRemove, ParseMode};

use crate::errors::Result;
use crate::menu::Menu;

use super::ui_builder::reply_keyboard;

/// What happens to the user's reply keyboard with a text message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard<'a> {
    /// Leave whatever keyboard the user has
    Unchanged,
    /// Replace it with this menu
    Show(&'a Menu),
    /// Take it away
    Remove,
}

/// An image loaded from disk, ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outbound side of a chat: everything delivery actions need to talk to users
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard<'_>) -> Result<()>;

    async fn send_image(&self, chat_id: ChatId, photo: Photo, caption: &str) -> Result<()>;
}

// Prompts and captions are written for Telegram's legacy Markdown
#[allow(deprecated)]
const PARSE_MODE: ParseMode = ParseMode::Markdown;

#[async_trait]
impl ChatTransport for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard<'_>) -> Result<()> {
        let request = self.send_message(chat_id, text).parse_mode(PARSE_MODE);
        match keyboard {
            Keyboard::Unchanged => request.await?,
            Keyboard::Show(menu) => request.reply_markup(reply_keyboard(menu)).await?,
            Keyboard::Remove => request.reply_markup(KeyboardRemove::new()).await?,
        };
        Ok(())
    }

    async fn send_image(&self, chat_id: ChatId, photo: Photo, caption: &str) -> Result<()> {
        let input = InputFile::memory(photo.bytes).file_name(photo.file_name);
        self.send_photo(chat_id, input)
            .caption(caption)
            .parse_mode(PARSE_MODE)
            .await?;
        Ok(())
    }
}
