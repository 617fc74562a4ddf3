//! Shared fixtures for integration tests: an on-disk resource tree and a
//! transport that records what the bot would have sent.

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use teloxide::types::ChatId;

use shora_bot::bot::{BotState, ChatTransport, Keyboard, Photo};
use shora_bot::catalog::Catalog;
use shora_bot::config::{AppPaths, BotConfig};
use shora_bot::errors::Result;
use shora_bot::event_log::EventLog;

pub const CONFIG_JSON: &str = r#"{
    "msg": {
        "welcome": "Welcome",
        "tnx": "Thanks",
        "wrong input": "Wrong input",
        "select main": "Choose a city",
        "select province": "Choose a province",
        "select city": "Choose a city of the province",
        "select ad": "Choose an ad",
        "back": "Back",
        "ad": "Ads",
        "other cities": "Other cities",
        "city prefix": "City",
        "province prefix": "Province",
        "ad prefix": "Ad",
        "ad suffix": "@shora",
        "list caption pattern": "Candidates of %s"
    },
    "promoted cities": ["alpha", "beta", "omega"]
}"#;

/// Something the bot sent to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: SentKeyboard,
    },
    Image {
        chat_id: ChatId,
        file_name: String,
        bytes: Vec<u8>,
        caption: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentKeyboard {
    Unchanged,
    Show(Vec<String>),
    Remove,
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: Keyboard<'_>) -> Result<()> {
        let keyboard = match keyboard {
            Keyboard::Unchanged => SentKeyboard::Unchanged,
            Keyboard::Show(menu) => SentKeyboard::Show(menu.choices.clone()),
            Keyboard::Remove => SentKeyboard::Remove,
        };
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn send_image(&self, chat_id: ChatId, photo: Photo, caption: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Image {
            chat_id,
            file_name: photo.file_name,
            bytes: photo.bytes,
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// In-memory event log sink
#[derive(Clone, Default)]
pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Resource tree used by most tests:
///
/// - lists: alpha, beta, gamma, and the Persian-spelled `کیش`
/// - provinces: P1 = {alpha, zzz}, P2 = {nowhere}, P3 = {gamma, beta}
/// - ads: `sale` (paired), `orphan-media`, `orphan-text`
pub fn resource_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(&root.join(".token"), b"123:token\n");
    write(&root.join("config.json"), CONFIG_JSON.as_bytes());
    write(
        &root.join("province_map.csv"),
        "Province,City\nP1,alpha\nP1,zzz\nP2,nowhere\nP3,gamma\nP3,beta\nIslands,\u{06A9}\u{06CC}\u{0634}\n"
            .as_bytes(),
    );
    for city in ["alpha", "beta", "gamma", "\u{06A9}\u{06CC}\u{0634}"] {
        write(&root.join("lists").join(format!("{city}.png")), city.as_bytes());
    }
    write(&root.join("lists").join("notes"), b"no extension");
    write(&root.join("ads/media/sale.jpg"), b"sale-image");
    write(&root.join("ads/texts/sale.txt"), b"Half price");
    write(&root.join("ads/media/orphan-media.jpg"), b"x");
    write(&root.join("ads/texts/orphan-text.txt"), b"y");

    dir
}

pub fn load_state(root: &Path, events: SharedBuffer) -> BotState {
    let paths = AppPaths::rooted_at(root);
    let config = BotConfig::load(&paths.config_file).unwrap();
    let catalog = Catalog::load(&paths).unwrap();
    BotState::new(config, catalog, EventLog::new(events))
}
