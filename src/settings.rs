use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read},
    path::Path,
    str::FromStr,
};

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::ConfigError;

const EMBEDDED_SETTINGS: &str = include_str!("../settings/email_settings.json");

/// Prefix used by JavaMail style property names, accepted as an alias for the short form
const LONG_KEY_PREFIX: &str = "mail.smtp.";

/// A parsed settings document. Top level keys are section names, each section
/// is a flat table of transport properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SettingsSource {
    sections: BTreeMap<String, Value>,
}

impl SettingsSource {
    /// The default settings compiled into the binary
    pub fn embedded() -> Result<Self, ConfigError> {
        debug!("Loading embedded settings");
        Self::parse(EMBEDDED_SETTINGS, "embedded settings")
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading settings from: {path:?}");
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Unreadable {
                    origin: format!("{path:?}"),
                    source,
                }
            }
        })?;
        Self::parse(&contents, &format!("{path:?}"))
    }

    /// Every reader produces its own independent source
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|source| ConfigError::Unreadable {
                origin: "stream".to_string(),
                source,
            })?;
        Self::parse(&contents, "stream")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Flattens the named section into string key/value pairs
    pub fn section(&self, name: &str) -> Result<ConnectionSettings, ConfigError> {
        let table = match self.sections.get(name) {
            Some(Value::Object(table)) => table,
            Some(_) => return Err(ConfigError::InvalidSection(name.to_string())),
            None => return Err(ConfigError::SectionNotFound(name.to_string())),
        };

        let mut values = BTreeMap::new();
        for (key, value) in table {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => render_number(n),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue, // Same as not being set
                Value::Array(_) | Value::Object(_) => {
                    return Err(ConfigError::InvalidValue {
                        section: name.to_string(),
                        key: key.clone(),
                    })
                }
            };
            values.insert(key.clone(), value);
        }

        if values.is_empty() {
            return Err(ConfigError::EmptySection(name.to_string()));
        }
        debug!("Loaded {} settings from section {name:?}", values.len());
        Ok(ConnectionSettings {
            section: name.to_string(),
            values,
        })
    }
}

/// Integral floats such as `587.0` are written without the fraction so they
/// still parse as ports and timeouts
fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

impl FromStr for SettingsSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, "string")
    }
}

/// The flattened settings of one section. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    section: String,
    values: BTreeMap<String, String>,
}

impl ConnectionSettings {
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Looks up `key` as written or with the `mail.smtp.` prefix
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .or_else(|| self.values.get(&format!("{LONG_KEY_PREFIX}{key}")))
            .map(String::as_str)
    }

    /// True only for a case insensitive `true`, anything else (including absent) is false
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
