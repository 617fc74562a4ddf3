//! # Error Types Module
//!
//! This module defines the error kinds used while loading the resource
//! catalog and while delivering resources to a chat.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the bot library
#[derive(Error, Debug)]
pub enum ShoraError {
    /// Startup configuration is missing or malformed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Filesystem errors while scanning resource directories
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Relation file could not be parsed
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    /// config.json could not be parsed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog entry points to a file that cannot be read at send time
    #[error("Resource unavailable: {}: {source}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The chat transport rejected a request
    #[error("Transport error: {0}")]
    Transport(#[from] teloxide::RequestError),
}

impl ShoraError {
    pub fn config(message: impl Into<String>) -> Self {
        ShoraError::Config {
            message: message.into(),
        }
    }

    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, ShoraError::ResourceUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, ShoraError>;
