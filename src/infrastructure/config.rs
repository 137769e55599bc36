//! Client configuration loaded from environment variables.

use crate::domain::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub login_path: String,
    pub token_file: PathBuf,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            login_path: "/login".to_string(),
            token_file: PathBuf::from("backoffice-session.json"),
            timeout: Duration::from_secs(30),
            log_file: PathBuf::from("backoffice.log"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup("BACKOFFICE_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "BACKOFFICE_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value,
                    });
                }
            },
            None => defaults.timeout,
        };

        Ok(Self {
            base_url: lookup("BACKOFFICE_API_URL").unwrap_or(defaults.base_url),
            login_path: lookup("BACKOFFICE_LOGIN_PATH").unwrap_or(defaults.login_path),
            token_file: lookup("BACKOFFICE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            timeout,
            log_file: lookup("BACKOFFICE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BACKOFFICE_API_URL", "https://shop.example.com/api"),
            ("BACKOFFICE_LOGIN_PATH", "/signin"),
            ("BACKOFFICE_TOKEN_FILE", "/tmp/session.json"),
            ("BACKOFFICE_TIMEOUT_SECS", "5"),
            ("BACKOFFICE_LOG_FILE", "/tmp/backoffice.log"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://shop.example.com/api");
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.token_file, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_file, PathBuf::from("/tmp/backoffice.log"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[("BACKOFFICE_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BACKOFFICE_TIMEOUT_SECS", .. }));

        assert!(ClientConfig::from_lookup(lookup_from(&[("BACKOFFICE_TIMEOUT_SECS", "0")])).is_err());
    }
}
