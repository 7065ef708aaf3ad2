use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::redaction::SecretKey;

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: SecretKey,
    pub base_url: String,
    pub timeout: Duration,
    pub http_addr: SocketAddr,
}

impl Config {
    /// Load from the environment, reading `.env` first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("PAYSTACK_SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("PAYSTACK_SECRET_KEY"))?;

        let base_url = lookup("PAYSTACK_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        url::Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
            var: "PAYSTACK_BASE_URL",
            reason: e.to_string(),
        })?;

        let timeout = match lookup("PAYSTACK_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "PAYSTACK_TIMEOUT_SECS",
                    reason: format!("expected a positive number of seconds, got {raw:?}"),
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let addr = lookup("PAYSTACK_HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.into());
        let http_addr = addr.trim().parse::<SocketAddr>().map_err(|e| {
            ConfigError::Invalid {
                var: "PAYSTACK_HTTP_ADDR",
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            secret_key: SecretKey::new(secret.trim()),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http_addr,
        })
    }
}

/// A missing `.env` is fine. One that exists but cannot be read or parsed is not.
fn load_dotenv<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        // The offending line may hold the secret key; report only where it failed.
        Err(dotenvy::Error::LineParse(_, index)) => Err(ConfigError::Invalid {
            var: ".env",
            reason: format!("parse error at index {index}"),
        }),
        Err(e) => Err(ConfigError::Invalid {
            var: ".env",
            reason: e.to_string(),
        }),
    }
}
