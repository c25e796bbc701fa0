use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use passvault_api::DEFAULT_HISTORY_LIMIT;
use passvault_api::token::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PASSVAULT_JWT_SECRET is unset or still a placeholder")]
    MissingSecret,

    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl_secs: i64,
    pub history_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("PASSVAULT_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            return Err(ConfigError::MissingSecret);
        }

        let db_path = lookup("PASSVAULT_DB_PATH")
            .unwrap_or_else(|| "passvault.db".into())
            .into();
        let host = lookup("PASSVAULT_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = parse_var(&lookup, "PASSVAULT_PORT", 8000u16, "a port number")?;

        let token_ttl_secs = parse_var(
            &lookup,
            "PASSVAULT_TOKEN_TTL_SECS",
            DEFAULT_TOKEN_TTL_SECS,
            "a number of seconds between 1 and 31536000",
        )?;
        if token_ttl_secs <= 0 || token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                var: "PASSVAULT_TOKEN_TTL_SECS",
                value: token_ttl_secs.to_string(),
                expected: "a number of seconds between 1 and 31536000",
            });
        }

        let history_limit = parse_var(
            &lookup,
            "PASSVAULT_HISTORY_LIMIT",
            DEFAULT_HISTORY_LIMIT,
            "a positive integer",
        )?;
        if history_limit == 0 {
            return Err(ConfigError::Invalid {
                var: "PASSVAULT_HISTORY_LIMIT",
                value: "0".into(),
                expected: "a positive integer",
            });
        }

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl_secs,
            history_limit,
        })
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}

fn parse_var<F, T>(
    lookup: &F,
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var,
                value,
                expected,
            }),
    }
}
