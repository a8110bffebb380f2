//! Settings file and start-up configuration.
//!
//! [`Settings`] is the optional TOML file; [`PipelineConfig`] is what the rest of the
//! crate receives, resolved once from the settings plus environment variables.
//!
//! ```toml
//! [source]
//! base_url = "https://api-fxpractice.oanda.com/v3"
//! count = 100
//! granularity = "D"
//! timeout_secs = 30
//!
//! [pipeline]
//! default_pair = "EUR/USD"
//! windows = [5, 50]
//! ```

use std::{path::Path, time::Duration};

use quote_source::{
    models::{granularity::Granularity, pair::CurrencyPair, request_params::DEFAULT_COUNT},
    providers::oanda_rest::{
        OandaConfig,
        config::{API_KEY_VAR, DEFAULT_TIMEOUT, PRACTICE_URL},
        params::MAX_COUNT,
    },
};
use secrecy::SecretString;
use serde::Deserialize;
use shared_utils::{
    config::ConfigError,
    env::{VarSource, lookup_var, require_var},
};

use crate::{cycle::CycleSettings, moving_average::WindowSet};

/// Connection string variable; takes precedence over the `DB_*` parts.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Port used when `DB_PORT` is unset.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Contents of the optional settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Quote provider settings.
    pub source: SourceSettings,
    /// Ingestion settings.
    pub pipeline: PipelineSettings,
}

/// `[source]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Provider API root.
    pub base_url: String,
    /// Candles per request.
    pub count: u32,
    /// Candle interval.
    pub granularity: Granularity,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: PRACTICE_URL.to_string(),
            count: DEFAULT_COUNT,
            granularity: Granularity::Daily,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[pipeline]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// Pair used when a request names none.
    pub default_pair: String,
    /// Moving-average window sizes.
    pub windows: Vec<usize>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_pair: "EUR/USD".to_string(),
            windows: WindowSet::default().into(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let settings_err = |reason: String| ConfigError::Settings {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| settings_err(e.to_string()))?;
        Self::from_toml_str(&text).map_err(|e| settings_err(e.to_string()))
    }
}

/// Everything a cycle needs, resolved once at start-up.
#[derive(Debug)]
pub struct PipelineConfig {
    /// Provider connection settings.
    pub source: OandaConfig,
    /// Store connection string; may carry a password.
    pub database_url: SecretString,
    /// Per-cycle request and derivation settings.
    pub cycle: CycleSettings,
    /// Pair used when an event names none.
    pub default_pair: CurrencyPair,
}

impl PipelineConfig {
    /// Validate `settings` and combine them with variables from `vars`.
    pub fn resolve(settings: Settings, vars: &impl VarSource) -> Result<Self, ConfigError> {
        let SourceSettings {
            base_url,
            count,
            granularity,
            timeout_secs,
        } = settings.source;

        if !(1..=MAX_COUNT).contains(&count) {
            return Err(ConfigError::invalid(
                "source.count",
                format!("{count} is outside 1..={MAX_COUNT}"),
            ));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::invalid("source.timeout_secs", "must be positive"));
        }
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("source.base_url", "must not be empty"));
        }
        let windows = WindowSet::new(settings.pipeline.windows)
            .map_err(|e| ConfigError::invalid("pipeline.windows", e.to_string()))?;
        let default_pair: CurrencyPair = settings
            .pipeline
            .default_pair
            .parse()
            .map_err(|e: quote_source::models::pair::PairParseError| {
                ConfigError::invalid("pipeline.default_pair", e.to_string())
            })?;

        let api_key = require_var(vars, API_KEY_VAR)?;
        let source = OandaConfig {
            base_url,
            api_key: SecretString::new(api_key.into()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            source,
            database_url: resolve_database_url(vars)?,
            cycle: CycleSettings {
                granularity,
                count,
                windows,
            },
            default_pair,
        })
    }
}

/// `DATABASE_URL`, or a PostgreSQL URL assembled from `DB_HOST`, `DB_PORT`, `DB_USER`,
/// `DB_PASS` and `DB_NAME`.
///
/// All parts except `DB_PORT` are required. An unset `DB_PORT` means
/// [`DEFAULT_DB_PORT`] (5432); a set one must parse as a port number.
pub fn resolve_database_url(vars: &impl VarSource) -> Result<SecretString, ConfigError> {
    if let Some(url) = lookup_var(vars, DATABASE_URL_VAR) {
        return Ok(SecretString::new(url.into()));
    }

    let host = require_var(vars, "DB_HOST")?;
    let port = match lookup_var(vars, "DB_PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid("DB_PORT", e.to_string()))?,
        None => DEFAULT_DB_PORT,
    };
    let user = require_var(vars, "DB_USER")?;
    let pass = require_var(vars, "DB_PASS")?;
    let name = require_var(vars, "DB_NAME")?;

    let url = format!(
        "postgresql://{}:{}@{host}:{port}/{name}",
        encode_userinfo(&user),
        encode_userinfo(&pass)
    );
    Ok(SecretString::new(url.into()))
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_userinfo(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
