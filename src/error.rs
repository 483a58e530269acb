use std::path::PathBuf;

use thiserror::Error;

/// Problems with the settings source or the provider profile. These surface
/// while constructing a [`crate::ProviderConfig`], never at send time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Settings file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read settings from {origin}: {source}")]
    Unreadable {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section {0:?} is not a table of settings")]
    InvalidSection(String),

    #[error("Section {0:?} defines no settings")]
    EmptySection(String),

    #[error("Setting {key:?} in section {section:?} must be a string, number or boolean")]
    InvalidValue { section: String, key: String },
}

/// Failure of a single dispatch attempt. The variant records which step of the
/// send failed; callers of [`crate::Mailer::send_with`] only see the rendered text.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("could not open session: {0}")]
    Session(String),

    #[error("could not build message: {0}")]
    Message(String),

    #[error("transport send failed: {0}")]
    Send(String),
}

impl DispatchError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    pub fn send(msg: impl Into<String>) -> Self {
        Self::Send(msg.into())
    }
}
