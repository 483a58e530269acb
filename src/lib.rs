mod cli;
mod dispatch;
mod error;
mod message;
mod provider;
mod session;
mod settings;

pub mod logging;

use anyhow::{bail, Context};
use log::debug;

pub use cli::{Cli, LogLevel};
pub use dispatch::Mailer;
pub use error::{ConfigError, DispatchError};
pub use message::{Content, MessageRequest};
pub use provider::{Provider, ProviderConfig};
pub use session::{Connector, Credentials, SmtpConnector};
pub use settings::{ConnectionSettings, SettingsSource};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let provider = cli.provider();
    let config = match cli.get_config_path() {
        Some(path) => ProviderConfig::from_path(provider, &path)
            .with_context(|| format!("Failed to load provider settings from {path:?}"))?,
        None => ProviderConfig::embedded(provider)
            .context("Failed to load provider settings from embedded defaults")?,
    };
    debug!("Using settings section {:?}", config.settings().section());

    let mailer = Mailer::new(config, Credentials::new(cli.username(), cli.password.as_str()));
    let mut failure = None;
    mailer.send_with(
        &cli.message_request(),
        || println!("Email sent"),
        |msg| failure = Some(msg),
    );
    if let Some(msg) = failure {
        bail!(msg);
    }
    Ok(())
}
