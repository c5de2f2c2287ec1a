//! Runtime configuration read from environment variables.
//!
//! | Variable            | Default                      |
//! |---------------------|------------------------------|
//! | `DATABASE_URL`      | unset: in-memory store       |
//! | `HOST`              | `0.0.0.0`                    |
//! | `PORT`              | `3000`                       |
//! | `OPENAI_API_KEY`    | unset: offline model         |
//! | `OPENAI_MODEL_NAME` | `gpt-4o-mini`                |
//! | `OPENAI_BASE_URL`   | `https://api.openai.com/v1`  |
//! | `AI_TIMEOUT_SECS`   | `60`                         |

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the language model client.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub ai: AiConfig,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = AiConfig::default();

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => 3000,
        };

        let timeout = match get("AI_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid { name: "AI_TIMEOUT_SECS", value })?,
            None => defaults.timeout,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            ai: AiConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL_NAME").unwrap_or(defaults.model),
                base_url: get("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.base_url),
                timeout,
            },
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
