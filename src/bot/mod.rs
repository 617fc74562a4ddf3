//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles `/start` and incoming text messages
//! - `delivery`: Sends menus, city lists and ads for a routed message
//! - `transport`: The `ChatTransport` seam and its teloxide implementation
//! - `ui_builder`: Creates reply keyboards from menus

pub mod delivery;
pub mod message_handler;
pub mod transport;
pub mod ui_builder;

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt};
use teloxide::prelude::*;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::BotConfig;
use crate::dialogue::MenuState;
use crate::event_log::EventLog;
use crate::labels::LabelSet;
use crate::menu::Menus;

// Re-export main handler functions for use in main.rs
pub use message_handler::{is_start_command, message_handler, start_handler};
pub use transport::{ChatTransport, Keyboard, Photo};

/// Read-only state shared by every handler
#[derive(Debug)]
pub struct BotState {
    pub labels: LabelSet,
    pub catalog: Catalog,
    pub menus: Menus,
    pub events: EventLog,
}

impl BotState {
    pub fn new(config: BotConfig, catalog: Catalog, events: EventLog) -> Self {
        let labels = config.msg.normalized();
        let menus = Menus::build(&catalog, &labels, &config.promoted_cities);
        Self {
            labels,
            catalog,
            menus,
            events,
        }
    }
}

/// Run long polling until interrupted
pub async fn run(bot: Bot, state: Arc<BotState>) -> Result<()> {
    let handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<MenuState>, MenuState>()
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(is_start_command))
                .endpoint(start_handler),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(message_handler));

    state.events.bot("Up and running...");
    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<MenuState>::new(), state])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
