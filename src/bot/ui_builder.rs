//! UI Builder module for turning menus into Telegram reply keyboards

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::menu::Menu;

/// Create a one-time reply keyboard with one button per row
pub fn reply_keyboard(menu: &Menu) -> KeyboardMarkup {
    let rows = menu
        .choices
        .iter()
        .map(|choice| vec![KeyboardButton::new(choice.clone())]);

    KeyboardMarkup::new(rows)
        .one_time_keyboard()
        .resize_keyboard()
}
