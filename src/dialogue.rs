//! Per-chat menu state.
//!
//! The keyboard a user sees is tracked so handlers can log where a user is,
//! but routing never reads it (see `router`).

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// The keyboard last shown to a chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuState {
    #[default]
    Main,
    Provinces,
    ProvinceCities {
        province: String,
    },
    Ads,
    /// A city list was delivered and the keyboard removed
    Idle,
}

/// Type alias for the menu dialogue
pub type MenuDialogue = Dialogue<MenuState, InMemStorage<MenuState>>;

impl MenuState {
    /// Short name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            MenuState::Main => "main",
            MenuState::Provinces => "provinces",
            MenuState::ProvinceCities { .. } => "province_cities",
            MenuState::Ads => "ads",
            MenuState::Idle => "idle",
        }
    }
}
