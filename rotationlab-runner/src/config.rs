//! Run configuration (TOML) and broker credentials (environment).

use rotationlab_core::data::{
    Credentials, RetryPolicy, Sector, Universe, UniverseError, DEFAULT_BASE_URL,
    INSTRUMENT_MASTER_URL,
};
use rotationlab_core::domain::{Exchange, InstrumentToken};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_KEY: &str = "SMARTAPI_API_KEY";
pub const ENV_CLIENT_CODE: &str = "SMARTAPI_CLIENT_CODE";
pub const ENV_PASSWORD: &str = "SMARTAPI_PASSWORD";
pub const ENV_TOTP_SECRET: &str = "SMARTAPI_TOTP_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Universe(#[from] UniverseError),
}

/// Retry settings as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Index the sector trajectories are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub name: String,
    pub token: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: "Nifty 50".into(),
            token: "99926000".into(),
        }
    }
}

impl BenchmarkConfig {
    pub fn token(&self) -> InstrumentToken {
        InstrumentToken::new(self.token.clone())
    }
}

/// Everything a run needs apart from credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub exchange: Exchange,
    pub base_url: String,
    pub instrument_master_url: String,
    /// Calendar days of candles behind each stock's metrics.
    pub lookback_days: u32,
    /// Trailing days on the rotation map (also the benchmark lookback).
    pub trajectory_days: u32,
    /// Pause after every successful request and after every stock.
    pub request_delay_ms: u64,
    pub retry: RetrySettings,
    pub benchmark: BenchmarkConfig,
    /// Replaces the built-in universe when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<Sector>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            exchange: Exchange::Nse,
            base_url: DEFAULT_BASE_URL.into(),
            instrument_master_url: INSTRUMENT_MASTER_URL.into(),
            lookback_days: 7,
            trajectory_days: 5,
            request_delay_ms: 500,
            retry: RetrySettings::default(),
            benchmark: BenchmarkConfig::default(),
            sectors: None,
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookback_days must be >= 1".into()));
        }
        if self.trajectory_days == 0 {
            return Err(ConfigError::Invalid("trajectory_days must be >= 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be >= 1".into()));
        }
        if self.benchmark.token.trim().is_empty() {
            return Err(ConfigError::Invalid("benchmark.token is empty".into()));
        }
        self.universe().validate()?;
        Ok(())
    }

    /// Configured sectors, or the built-in NSE universe.
    pub fn universe(&self) -> Universe {
        match &self.sectors {
            Some(sectors) => Universe {
                sectors: sectors.clone(),
            },
            None => Universe::default_nse(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.policy()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Read credentials from the process environment.
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    credentials_from(|key| std::env::var(key).ok())
}

/// Read credentials through an arbitrary lookup; blank values count as missing.
pub fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Credentials, ConfigError> {
    let get = |key: &'static str| {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(key))
    };
    Ok(Credentials {
        api_key: get(ENV_API_KEY)?,
        client_code: get(ENV_CLIENT_CODE)?,
        password: get(ENV_PASSWORD)?,
        totp_secret: get(ENV_TOTP_SECRET)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_pipeline_constants() {
        let c = RunConfig::default();
        assert_eq!(c.exchange, Exchange::Nse);
        assert_eq!(c.lookback_days, 7);
        assert_eq!(c.trajectory_days, 5);
        assert_eq!(c.request_delay(), Duration::from_millis(500));
        assert_eq!(c.retry_policy(), RetryPolicy::default());
        assert_eq!(c.benchmark.token, "99926000");
        assert_eq!(c.universe(), Universe::default_nse());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RunConfig::from_toml("").unwrap(), RunConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let c = RunConfig::from_toml(
            r#"
lookback_days = 10
request_delay_ms = 250

[retry]
max_attempts = 5

[[sectors]]
name = "Media"
symbols = ["ZEEL", "SUNTV"]
"#,
        )
        .unwrap();
        assert_eq!(c.lookback_days, 10);
        assert_eq!(c.trajectory_days, 5);
        assert_eq!(c.retry.max_attempts, 5);
        assert_eq!(c.retry.base_delay_ms, 1_000);
        assert_eq!(c.universe().sector_names(), vec!["Media"]);
    }

    #[test]
    fn rejects_zero_windows() {
        assert!(matches!(
            RunConfig::from_toml("lookback_days = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_toml("trajectory_days = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_toml("[retry]\nmax_attempts = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_sector_list() {
        assert!(matches!(
            RunConfig::from_toml("sectors = []"),
            Err(ConfigError::Universe(UniverseError::Empty))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let c = RunConfig::default();
        let parsed = RunConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn credentials_require_every_variable() {
        let mut env: HashMap<&str, String> = HashMap::new();
        env.insert(ENV_API_KEY, "key".into());
        env.insert(ENV_CLIENT_CODE, "A123".into());
        env.insert(ENV_PASSWORD, "1234".into());
        let err = credentials_from(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_TOTP_SECRET)));

        env.insert(ENV_TOTP_SECRET, "  ".into());
        assert!(credentials_from(|k| env.get(k).cloned()).is_err());

        env.insert(ENV_TOTP_SECRET, "GEZDGNBV".into());
        let creds = credentials_from(|k| env.get(k).cloned()).unwrap();
        assert_eq!(creds.client_code, "A123");
    }
}
