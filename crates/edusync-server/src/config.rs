use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::warn;

use edusync_completion::ChatClientConfig;
use edusync_completion::chat::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub jwt_secret: String,
    pub completion: ChatClientConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_key = lookup("GROQ_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("GROQ_API_KEY is not set; add it to the environment or .env");
        }

        let jwt_secret = match lookup("EDUSYNC_JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("EDUSYNC_JWT_SECRET is unset; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let host = var("EDUSYNC_HOST", "0.0.0.0");
        let port: u16 = var("EDUSYNC_PORT", "5000")
            .parse()
            .context("EDUSYNC_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("EDUSYNC_HOST must be an IP address")?;

        let timeout_secs: u64 = var("EDUSYNC_COMPLETION_TIMEOUT_SECS", "60")
            .parse()
            .context("EDUSYNC_COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            addr,
            db_path: var("EDUSYNC_DB_PATH", "database.db").into(),
            static_dir: var("EDUSYNC_STATIC_DIR", "static").into(),
            jwt_secret,
            completion: ChatClientConfig {
                base_url: var("EDUSYNC_COMPLETION_URL", DEFAULT_BASE_URL),
                api_key,
                model: var("EDUSYNC_COMPLETION_MODEL", DEFAULT_MODEL),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));

        assert!(Config::from_lookup(lookup(&[("GROQ_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.db_path, PathBuf::from("database.db"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.completion.model, "llama-3.1-8b-instant");
        assert_eq!(config.completion.timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("EDUSYNC_HOST", "127.0.0.1"),
            ("EDUSYNC_PORT", "8088"),
            ("EDUSYNC_JWT_SECRET", "s3cret"),
            ("EDUSYNC_COMPLETION_MODEL", "llama-3.3-70b-versatile"),
            ("EDUSYNC_COMPLETION_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8088");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(config.completion.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("EDUSYNC_PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
