//! Pipeline configuration.
//!
//! # Responsibility
//! - Hold timing constants and fixed targets of the submission pipeline.
//! - Load overrides from JSON with defaults for every omitted key.
//!
//! # Invariants
//! - A validated config never names a decoy field that collides with a
//!   known rule field.
//! - The fade delay is strictly shorter than the notification lifetime.

use crate::form::honeypot::DEFAULT_DECOY_NAME;
use crate::form::rules::FieldId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_NOTIFICATION_LIFETIME_MS: u64 = 5_000;
pub const DEFAULT_NOTIFICATION_FADE_MS: u64 = 300;
pub const DEFAULT_SUBMIT_LATENCY_MS: u64 = 1_000;
pub const DEFAULT_CONFIRMATION_TARGET: &str = "thank_you.html";
pub const DEFAULT_FORM_MARKER: &str = "needs-validation";

/// Tunables of the form pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Time from creation until a notification starts fading.
    pub notification_lifetime_ms: u64,
    /// Fade duration before a notification is detached.
    pub notification_fade_ms: u64,
    /// Round-trip delay before a dispatched submission resolves.
    pub submit_latency_ms: u64,
    /// Where the browser goes after a successful submission.
    pub confirmation_target: String,
    pub honeypot_field: String,
    /// Forms carrying this marker get the pipeline attached.
    pub form_marker: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            notification_lifetime_ms: DEFAULT_NOTIFICATION_LIFETIME_MS,
            notification_fade_ms: DEFAULT_NOTIFICATION_FADE_MS,
            submit_latency_ms: DEFAULT_SUBMIT_LATENCY_MS,
            confirmation_target: DEFAULT_CONFIRMATION_TARGET.to_string(),
            honeypot_field: DEFAULT_DECOY_NAME.to_string(),
            form_marker: DEFAULT_FORM_MARKER.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.confirmation_target.trim().is_empty() {
            return Err(ConfigError::EmptyValue("confirmation_target"));
        }
        if self.honeypot_field.trim().is_empty() {
            return Err(ConfigError::EmptyValue("honeypot_field"));
        }
        if self.form_marker.trim().is_empty() {
            return Err(ConfigError::EmptyValue("form_marker"));
        }
        if FieldId::from_name(self.honeypot_field.trim()).is_some() {
            return Err(ConfigError::DecoyCollision(self.honeypot_field.clone()));
        }
        if self.notification_lifetime_ms == 0 {
            return Err(ConfigError::ZeroLifetime);
        }
        if self.notification_fade_ms >= self.notification_lifetime_ms {
            return Err(ConfigError::FadeNotShorterThanLifetime {
                fade_ms: self.notification_fade_ms,
                lifetime_ms: self.notification_lifetime_ms,
            });
        }
        Ok(())
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_lifetime_ms)
    }

    pub fn notification_fade(&self) -> Duration {
        Duration::from_millis(self.notification_fade_ms)
    }

    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }
}

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    EmptyValue(&'static str),
    DecoyCollision(String),
    ZeroLifetime,
    FadeNotShorterThanLifetime {
        fade_ms: u64,
        lifetime_ms: u64,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::EmptyValue(key) => write!(f, "config value `{key}` must not be empty"),
            Self::DecoyCollision(name) => {
                write!(f, "honeypot field `{name}` collides with a validated field")
            }
            Self::ZeroLifetime => write!(f, "notification lifetime must be positive"),
            Self::FadeNotShorterThanLifetime {
                fade_ms,
                lifetime_ms,
            } => write!(
                f,
                "notification fade ({fade_ms} ms) must be shorter than lifetime ({lifetime_ms} ms)"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
