use serde::Deserialize;

use crate::models::candle::RawCandle;

/// Body of a successful candles response.
#[derive(Deserialize, Debug)]
pub struct CandlesResponse {
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub granularity: Option<String>,
    pub candles: Vec<RawCandle>,
}

/// Body the API sends alongside 4xx/5xx statuses.
#[derive(Deserialize, Debug)]
pub struct ErrorResponse {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

/// Extracts `errorMessage` from an error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error_message,
        Err(_) if body.trim().is_empty() => "Unknown API error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
