use std::{fmt::Debug, time::Duration};

use lettre::{
    transport::smtp::{
        authentication::Credentials as SmtpCredentials,
        client::{Tls, TlsParameters},
    },
    SmtpTransport, Transport,
};
use log::debug;

use crate::{settings::ConnectionSettings, DispatchError};

/// Username and password used to authenticate with the provider
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opens the transport used for a single send
pub trait Connector {
    type Transport: Transport;

    fn connect(
        &self,
        settings: &ConnectionSettings,
        credentials: &Credentials,
    ) -> Result<Self::Transport, DispatchError>;
}

/// Connects to the provider over SMTP using lettre
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpConnector;

impl Connector for SmtpConnector {
    type Transport = SmtpTransport;

    fn connect(
        &self,
        settings: &ConnectionSettings,
        credentials: &Credentials,
    ) -> Result<SmtpTransport, DispatchError> {
        let params = SessionParams::try_from(settings)?;
        debug!(
            "Opening SMTP session to {}:{} security={:?} auth={} as {:?}",
            params.host,
            params
                .port
                .map_or_else(|| "default".to_string(), |p| p.to_string()),
            params.security,
            params.auth,
            credentials.username(),
        );
        params.build(credentials)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Security {
    None,
    /// Upgrade with STARTTLS if the server offers it
    Opportunistic,
    /// Refuse to continue without STARTTLS
    Required,
    /// TLS from the first byte
    Wrapper,
}

/// Typed view of the transport properties in a section
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionParams {
    host: String,
    port: Option<u16>,
    auth: bool,
    security: Security,
    timeout: Option<Duration>,
}

impl TryFrom<&ConnectionSettings> for SessionParams {
    type Error = DispatchError;

    fn try_from(settings: &ConnectionSettings) -> Result<Self, Self::Error> {
        let host = match settings.get("host").map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(DispatchError::session(format!(
                    "no host configured in section {:?}",
                    settings.section()
                )))
            }
        };

        let port = settings
            .get("port")
            .map(|raw| {
                raw.trim().parse::<u16>().map_err(|e| {
                    DispatchError::session(format!("invalid port {raw:?}: {e}"))
                })
            })
            .transpose()?;

        let timeout = settings
            .get("timeout")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| DispatchError::session(format!("invalid timeout {raw:?}: {e}")))
            })
            .transpose()?;

        let security = if settings.flag("ssl.enable") {
            Security::Wrapper
        } else if settings.flag("starttls.required") {
            Security::Required
        } else if settings.flag("starttls.enable") {
            Security::Opportunistic
        } else {
            Security::None
        };

        Ok(Self {
            host,
            port,
            auth: settings.flag("auth"),
            security,
            timeout,
        })
    }
}

impl SessionParams {
    fn build(&self, credentials: &Credentials) -> Result<SmtpTransport, DispatchError> {
        let host = self.host.as_str();
        let builder = match self.security {
            Security::Wrapper => SmtpTransport::relay(host),
            Security::Required => SmtpTransport::starttls_relay(host),
            Security::Opportunistic => TlsParameters::new(host.to_string())
                .map(|tls| SmtpTransport::builder_dangerous(host).tls(Tls::Opportunistic(tls))),
            Security::None => Ok(SmtpTransport::builder_dangerous(host)),
        };
        let mut builder = builder
            .map_err(|e| DispatchError::session(format!("failed to set up TLS for {host}: {e}")))?;

        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(Some(timeout));
        }
        if self.auth {
            builder = builder.credentials(SmtpCredentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        } else {
            debug!("Authentication disabled for {host}, credentials not sent");
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SettingsSource;
    use rstest::rstest;

    fn settings(body: &str) -> ConnectionSettings {
        let source: SettingsSource = format!(r#"{{ "Test": {{ {body} }} }}"#).parse().unwrap();
        source.section("Test").unwrap()
    }

    #[test]
    fn params_from_gmail_style_settings() {
        // Arrange
        let settings = settings(
            r#""host": "smtp.gmail.com", "port": "587", "auth": "true", "starttls.enable": "true""#,
        );
        let expected = SessionParams {
            host: "smtp.gmail.com".to_string(),
            port: Some(587),
            auth: true,
            security: Security::Opportunistic,
            timeout: None,
        };

        // Act
        let actual = SessionParams::try_from(&settings).unwrap();

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn params_from_long_keys() {
        let settings = settings(
            r#""mail.smtp.host": "mail.example.com", "mail.smtp.port": 465, "mail.smtp.ssl.enable": true, "mail.smtp.timeout": 2500"#,
        );
        let actual = SessionParams::try_from(&settings).unwrap();
        assert_eq!(actual.host, "mail.example.com");
        assert_eq!(actual.port, Some(465));
        assert!(!actual.auth);
        assert_eq!(actual.security, Security::Wrapper);
        assert_eq!(actual.timeout, Some(Duration::from_millis(2500)));
    }

    #[rstest]
    #[case(r#""ssl.enable": "true", "starttls.required": "true""#, Security::Wrapper)]
    #[case(r#""starttls.required": "true", "starttls.enable": "true""#, Security::Required)]
    #[case(r#""starttls.enable": "true""#, Security::Opportunistic)]
    #[case(r#""starttls.enable": "false""#, Security::None)]
    fn security_precedence(#[case] flags: &str, #[case] expected: Security) {
        let settings = settings(&format!(r#""host": "h.test", {flags}"#));
        let actual = SessionParams::try_from(&settings).unwrap();
        assert_eq!(actual.security, expected);
    }

    #[rstest]
    #[case(r#""port": "25""#)]
    #[case(r#""host": "  ""#)]
    fn missing_host(#[case] body: &str) {
        let err = SessionParams::try_from(&settings(body)).unwrap_err();
        assert!(matches!(err, DispatchError::Session(msg) if msg.contains("no host")));
    }

    #[rstest]
    #[case(r#""host": "h.test", "port": "smtp""#, "invalid port")]
    #[case(r#""host": "h.test", "port": "70000""#, "invalid port")]
    #[case(r#""host": "h.test", "timeout": "soon""#, "invalid timeout")]
    fn invalid_numbers(#[case] body: &str, #[case] expected: &str) {
        let err = SessionParams::try_from(&settings(body)).unwrap_err();
        assert!(matches!(err, DispatchError::Session(msg) if msg.contains(expected)));
    }

    #[test]
    fn plain_transport_builds_without_network() {
        let settings = settings(r#""host": "localhost", "port": "2525", "auth": "true""#);
        let credentials = Credentials::new("me@example.com", "secret");
        assert!(SmtpConnector.connect(&settings, &credentials).is_ok());
    }

    #[test]
    fn debug_hides_password() {
        let credentials = Credentials::new("me@example.com", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("me@example.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
