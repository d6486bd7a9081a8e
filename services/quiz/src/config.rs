//! Application Configuration Module
//!
//! Settings for the terminal quiz are read from environment variables (and a
//! `.env` file, if present). Command-line flags override them in `main`.

use quiz_core::authoring::DEFAULT_PIN;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Speech rate relative to normal; slightly slower for clarity.
pub const DEFAULT_SPEECH_RATE: f32 = 0.9;
/// How long single-shot recognition waits for an utterance.
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(8);

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub questions: Option<PathBuf>,
    pub authoring_pin: String,
    pub speech_rate: f32,
    pub voice_enabled: bool,
    pub listen_timeout: Duration,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `QUIZ_QUESTIONS`: (Optional) A JSON question file, or a directory of them.
    /// *   `QUIZ_AUTHORING_PIN`: (Optional) PIN guarding the question form. Defaults to "0000".
    /// *   `QUIZ_SPEECH_RATE`: (Optional) Speech rate between 0.1 and 10. Defaults to 0.9.
    /// *   `QUIZ_VOICE`: (Optional) "on" or "off". Defaults to "on".
    /// *   `QUIZ_LISTEN_TIMEOUT_SECS`: (Optional) Seconds to wait for speech. Defaults to 8.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. This is useful for local development and is ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let questions = lookup("QUIZ_QUESTIONS")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let authoring_pin = lookup("QUIZ_AUTHORING_PIN").unwrap_or_else(|| DEFAULT_PIN.to_string());
        if authoring_pin.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "QUIZ_AUTHORING_PIN",
                "PIN must not be empty".to_string(),
            ));
        }

        let speech_rate = match lookup("QUIZ_SPEECH_RATE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|rate| (0.1..=10.0).contains(rate))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "QUIZ_SPEECH_RATE",
                        format!("'{raw}' is not a rate between 0.1 and 10"),
                    )
                })?,
            None => DEFAULT_SPEECH_RATE,
        };

        let voice_enabled = match lookup("QUIZ_VOICE") {
            Some(raw) => parse_switch(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("QUIZ_VOICE", raw.clone()))?,
            None => true,
        };

        let listen_timeout = match lookup("QUIZ_LISTEN_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidValue("QUIZ_LISTEN_TIMEOUT_SECS", raw.clone()))?,
            None => DEFAULT_LISTEN_TIMEOUT,
        };

        // Configure logging level from RUST_LOG, with a sensible default.
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        Ok(Self {
            questions,
            authoring_pin,
            speech_rate,
            voice_enabled,
            listen_timeout,
            log_level,
        })
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.questions, None);
        assert_eq!(config.authoring_pin, "0000");
        assert_eq!(config.speech_rate, DEFAULT_SPEECH_RATE);
        assert!(config.voice_enabled);
        assert_eq!(config.listen_timeout, DEFAULT_LISTEN_TIMEOUT);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("QUIZ_QUESTIONS", "questions/"),
            ("QUIZ_AUTHORING_PIN", "4321"),
            ("QUIZ_SPEECH_RATE", "1.5"),
            ("QUIZ_VOICE", "off"),
            ("QUIZ_LISTEN_TIMEOUT_SECS", "3"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();

        assert_eq!(config.questions, Some(PathBuf::from("questions/")));
        assert_eq!(config.authoring_pin, "4321");
        assert_eq!(config.speech_rate, 1.5);
        assert!(!config.voice_enabled);
        assert_eq!(config.listen_timeout, Duration::from_secs(3));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("QUIZ_SPEECH_RATE", "fast")]),
            Err(ConfigError::InvalidValue("QUIZ_SPEECH_RATE", _))
        ));
        assert!(matches!(
            config_from(&[("QUIZ_SPEECH_RATE", "0")]),
            Err(ConfigError::InvalidValue("QUIZ_SPEECH_RATE", _))
        ));
        assert!(matches!(
            config_from(&[("QUIZ_VOICE", "maybe")]),
            Err(ConfigError::InvalidValue("QUIZ_VOICE", _))
        ));
        assert!(matches!(
            config_from(&[("QUIZ_AUTHORING_PIN", " ")]),
            Err(ConfigError::InvalidValue("QUIZ_AUTHORING_PIN", _))
        ));
        assert!(matches!(
            config_from(&[("RUST_LOG", "loud")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
