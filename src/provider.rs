use std::{convert::Infallible, fmt::Display, path::Path, str::FromStr};

use log::debug;

use crate::{settings::ConnectionSettings, ConfigError, SettingsSource};

/// Identifies which section of the settings source describes the mail provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gmail,
    Outlook,
    /// Any other section, named exactly as in the settings source
    Section(String),
}

impl Provider {
    pub fn section_name(&self) -> &str {
        match self {
            Provider::Gmail => "Gmail",
            Provider::Outlook => "Outlook",
            Provider::Section(name) => name,
        }
    }
}

impl FromStr for Provider {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gmail" | "Gmail" => Provider::Gmail,
            "outlook" | "Outlook" => Provider::Outlook,
            other => Provider::Section(other.to_string()),
        })
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.section_name())
    }
}

/// A provider together with the connection settings loaded for it
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    provider: Provider,
    settings: ConnectionSettings,
}

impl ProviderConfig {
    pub fn load(provider: Provider, source: &SettingsSource) -> Result<Self, ConfigError> {
        validate(&provider)?;
        let settings = source.section(provider.section_name())?;
        debug!("Provider {provider} configured with {} settings", settings.len());
        Ok(Self { provider, settings })
    }

    /// Loads from a settings file, the file is only read once the provider is known to be valid
    pub fn from_path(provider: Provider, path: &Path) -> Result<Self, ConfigError> {
        validate(&provider)?;
        Self::load(provider, &SettingsSource::from_path(path)?)
    }

    pub fn embedded(provider: Provider) -> Result<Self, ConfigError> {
        validate(&provider)?;
        Self::load(provider, &SettingsSource::embedded()?)
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }
}

fn validate(provider: &Provider) -> Result<(), ConfigError> {
    if provider.section_name().trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration(
            "provider section name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
