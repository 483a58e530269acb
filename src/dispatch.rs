use std::fmt::Display;

use lettre::Transport;
use log::{debug, info};

use crate::{
    session::{Connector, Credentials, SmtpConnector},
    DispatchError, MessageRequest, ProviderConfig,
};

/// Sends single messages through the configured provider. Each send opens its
/// own session and nothing carries over between sends.
#[derive(Debug)]
pub struct Mailer<C = SmtpConnector> {
    config: ProviderConfig,
    credentials: Credentials,
    connector: C,
}

impl Mailer {
    pub fn new(config: ProviderConfig, credentials: Credentials) -> Self {
        Self::with_connector(config, credentials, SmtpConnector)
    }
}

impl<C> Mailer<C>
where
    C: Connector,
    <C::Transport as Transport>::Error: Display,
{
    pub fn with_connector(config: ProviderConfig, credentials: Credentials, connector: C) -> Self {
        Self {
            config,
            credentials,
            connector,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Connects, builds the message and sends it. Blocks until the transport returns.
    pub fn send(&self, request: &MessageRequest) -> Result<(), DispatchError> {
        debug!(
            "Dispatching {:?} to {:?} via {}",
            request.subject,
            request.to,
            self.config.provider()
        );
        let transport = self
            .connector
            .connect(self.config.settings(), &self.credentials)?;
        let message = request.to_message()?;
        transport
            .send(&message)
            .map_err(|e| DispatchError::send(e.to_string()))?;
        Ok(())
    }

    /// Same as [`Mailer::send`] but reports the outcome through exactly one of
    /// the callbacks, invoked before this returns.
    pub fn send_with<S, F>(&self, request: &MessageRequest, on_success: S, on_failure: F)
    where
        S: FnOnce(),
        F: FnOnce(String),
    {
        match self.send(request) {
            Ok(()) => {
                info!("Email sent to {:?}", request.to);
                on_success();
            }
            Err(e) => {
                debug!("Email to {:?} failed: {e}", request.to);
                on_failure(format!("Failed to send email: {e}"));
            }
        }
    }
}
