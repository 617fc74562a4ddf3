//! # Shora Telegram Bot
//!
//! A menu-driven Telegram bot that hands out city candidate lists and ads
//! from flat files, plus an offline analyzer for its usage log.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod event_log;
pub mod labels;
pub mod log_analysis;
pub mod menu;
pub mod router;
pub mod text_processing;
