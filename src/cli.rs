use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::{MessageRequest, Provider};

#[derive(Parser, Clone, Eq, PartialEq, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Sends a single email through a mail provider described in a settings file."
)]
pub struct Cli {
    /// Specify settings file to use
    ///
    /// If not specified uses the settings compiled into the program
    #[arg(long = "config", short, value_name = "PATH")]
    pub config_filename: Option<String>,

    /// Section of the settings file describing the provider
    ///
    /// `gmail`/`Gmail` and `outlook`/`Outlook` select the built in profiles, any other
    /// value is used as the section name exactly as written
    #[arg(long, short, default_value = "gmail")]
    pub provider: String,

    /// Sender address
    #[arg(long)]
    pub from: String,

    /// Display name shown with the sender address
    #[arg(long, value_name = "NAME")]
    pub from_name: Option<String>,

    /// Recipients, separated by commas
    #[arg(long)]
    pub to: String,

    #[arg(long, short, default_value = "")]
    pub subject: String,

    /// Plain text body
    #[arg(long, required_unless_present = "html")]
    pub body: Option<String>,

    /// HTML body, takes precedence over --body
    #[arg(long)]
    pub html: Option<String>,

    /// Login name, defaults to the sender address
    #[arg(long, short)]
    pub username: Option<String>,

    #[arg(long, env = "MAIL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn get_config_path(&self) -> Option<PathBuf> {
        self.config_filename.as_ref().map(PathBuf::from)
    }

    pub fn provider(&self) -> Provider {
        match self.provider.parse() {
            Ok(provider) => provider,
            Err(never) => match never {},
        }
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.from)
    }

    pub fn message_request(&self) -> MessageRequest {
        MessageRequest {
            from: self.from.clone(),
            from_name: self.from_name.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            body_html: self.html.clone(),
        }
    }
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
