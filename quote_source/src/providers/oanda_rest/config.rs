use std::time::Duration;

use secrecy::SecretString;

/// Practice (fxTrade demo) API root.
pub const PRACTICE_URL: &str = "https://api-fxpractice.oanda.com/v3";

/// Variable holding the bearer token.
pub const API_KEY_VAR: &str = "OANDA_API_KEY";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`super::OandaProvider`].
#[derive(Debug)]
pub struct OandaConfig {
    /// API root without a trailing slash, e.g. [`PRACTICE_URL`].
    pub base_url: String,
    pub api_key: SecretString,
    /// Upper bound for one request, connect through body.
    pub timeout: Duration,
}

impl OandaConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            base_url: PRACTICE_URL.to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
