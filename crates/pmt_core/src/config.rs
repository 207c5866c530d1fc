//! Runtime environment settings.
//!
//! # Responsibility
//! - Describe the deployment target the data layer runs in.
//! - Load settings from JSON text or a JSON file.
//!
//! # Invariants
//! - A validated `Environment` always has a non-blank `api_url`.
//! - Level names parse case-insensitively; `warning` is accepted for `warn`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEVELOPMENT_API_URL: &str = "http://localhost:8080/api";
const PRODUCTION_API_URL: &str = "https://pmt-backend-production.up.railway.app/api";

/// Log verbosity, ordered from quietest to noisiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            )),
        }
    }
}

/// Deployment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub production: bool,
    pub api_url: String,
    pub log_level: LogLevel,
    pub feature_flag: bool,
}

impl Environment {
    /// Local development preset.
    pub fn development() -> Self {
        Self {
            production: false,
            api_url: DEVELOPMENT_API_URL.to_string(),
            log_level: LogLevel::Debug,
            feature_flag: true,
        }
    }

    /// Hosted production preset.
    pub fn production() -> Self {
        Self {
            production: true,
            api_url: PRODUCTION_API_URL.to_string(),
            log_level: LogLevel::Error,
            feature_flag: true,
        }
    }

    /// Parses and validates settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let env: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        env.validate()?;
        Ok(env)
    }

    /// Reads, parses and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "apiUrl cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::development()
    }
}

/// Failure while loading settings.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Environment, LogLevel};

    #[test]
    fn level_parsing_accepts_aliases_and_case() {
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.contains("verbose"));
    }

    #[test]
    fn production_preset_is_quiet() {
        let env = Environment::production();
        assert!(env.production);
        assert_eq!(env.log_level, LogLevel::Error);
        assert!(env.api_url.starts_with("https://"));
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let env = Environment::from_json_str(
            r#"{"production":false,"apiUrl":"http://api.test","logLevel":"info","featureFlag":false}"#,
        )
        .unwrap();
        assert_eq!(env.api_url, "http://api.test");
        assert_eq!(env.log_level, LogLevel::Info);
        assert!(!env.feature_flag);
    }

    #[test]
    fn blank_api_url_is_rejected() {
        let err = Environment::from_json_str(
            r#"{"production":true,"apiUrl":"  ","logLevel":"error","featureFlag":true}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
