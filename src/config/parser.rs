//! Configuration file parsing and writing.
//!
//! Files are YAML or TOML; the format is picked from the file extension
//! (`.yaml`, `.yml` or `.toml`, case-insensitive). Both directions work on any
//! serde type, so the same helpers read a whole [`Value`] document or a
//! caller's own typed struct.
//!
//! # Error Handling
//!
//! Every failure is reported with the file path as `anyhow` context; the
//! root cause is a [`SpinnerError`] so callers can still match on it:
//!
//! ```text
//! Failed to parse config file: /path/to/instrument_config.yaml
//! Caused by:
//!     YAML error: devices: did not find expected ',' or '}' at line 3 column 1
//! ```
//!
//! [`Value`]: crate::spec::Value

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

use crate::core::SpinnerError;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// The format implied by `path`'s extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), failing with
    /// [`SpinnerError::UnsupportedConfigFormat`].
    pub fn require(path: &Path) -> Result<Self, SpinnerError> {
        Self::from_path(path).ok_or_else(|| SpinnerError::UnsupportedConfigFormat {
            path: path.to_path_buf(),
        })
    }

    /// Deserialize `content` in this format.
    pub fn parse_str<T>(self, content: &str) -> Result<T, SpinnerError>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }

    /// Serialize `value` in this format.
    pub fn render<T>(self, value: &T) -> Result<String, SpinnerError>
    where
        T: serde::Serialize,
    {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// Parse a YAML or TOML configuration file into the specified type.
///
/// ```rust,no_run
/// use device_spinner::config::parse_config;
/// use device_spinner::spec::Value;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let document: Value = parse_config(Path::new("instrument_config.yaml"))?;
/// println!("sections: {:?}", document.as_map().map(|m| m.len()));
/// # Ok(())
/// # }
/// ```
///
/// # Error Conditions
///
/// - the extension is not `.yaml`, `.yml` or `.toml`
/// - the file cannot be read
/// - the content is not valid for the format or does not match `T`
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let format = ConfigFormat::require(path)?;

    let content = std::fs::read_to_string(path)
        .map_err(SpinnerError::from)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = format
        .parse_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Write `value` to `path` in the given format.
pub fn write_config<T>(path: &Path, value: &T, format: ConfigFormat) -> Result<()>
where
    T: serde::Serialize,
{
    let content = format
        .render(value)
        .with_context(|| format!("Failed to serialize {format} config for {}", path.display()))?;

    std::fs::write(path, content)
        .map_err(SpinnerError::from)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}
