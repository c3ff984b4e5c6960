//! Configuration management using environment variables

use crate::error::{Error, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Process-wide configuration shared by every binary in the workspace.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name used to tag log lines and diagnostics for this process.
    pub service_name: String,
}

impl Config {
    /// Load configuration from environment variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            service_name: env_or("SERVICE_NAME", "trigger-engine"),
        })
    }
}

/// Read an environment variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when unset.
///
/// Returns a [`Error::Config`] if the variable is set but fails to parse.
pub fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::config(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("TRIGGER_ENGINE_TEST_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_env_or_falls_back() {
        let value: usize = parse_env_or("TRIGGER_ENGINE_TEST_UNSET_USIZE", 10).unwrap();
        assert_eq!(value, 10);
    }

    #[test]
    fn test_parse_env_or_rejects_invalid() {
        std::env::set_var("TRIGGER_ENGINE_TEST_BAD_USIZE", "not-a-number");
        let result: Result<usize> = parse_env_or("TRIGGER_ENGINE_TEST_BAD_USIZE", 10);
        assert!(result.is_err());
        std::env::remove_var("TRIGGER_ENGINE_TEST_BAD_USIZE");
    }
}
