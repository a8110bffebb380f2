//! Scheduler event entry point.
//!
//! Payload: `{"currency_pair": "EUR/USD"}`; the key is optional and defaults to the
//! configured pair. The response mirrors what a function-style trigger expects.

use quote_source::{models::pair::CurrencyPair, providers::QuoteSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_utils::config::ConfigError;

use crate::{config::PipelineConfig, cycle::execute_cycle, errors::IngestError};

/// Incoming trigger payload.
#[derive(Debug, Default, Deserialize)]
pub struct IngestEvent {
    /// Pair to ingest; the configured default when absent.
    #[serde(default)]
    pub currency_pair: Option<String>,
}

/// Response for a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    /// HTTP-style status, 200 on success.
    pub status_code: u16,
    /// Human-readable summary.
    pub body: String,
    /// Bars written.
    pub inserted_count: usize,
    /// Bars already present.
    pub skipped_count: usize,
}

/// Pair named by `payload`, or `default` when it names none.
pub fn resolve_pair(payload: &Value, default: &CurrencyPair) -> Result<CurrencyPair, ConfigError> {
    if payload.is_null() {
        return Ok(default.clone());
    }
    let event: IngestEvent = serde_json::from_value(payload.clone())
        .map_err(|e| ConfigError::invalid("event", e.to_string()))?;
    match event.currency_pair {
        Some(pair) => pair
            .parse()
            .map_err(|e: quote_source::models::pair::PairParseError| {
                ConfigError::invalid("currency_pair", e.to_string())
            }),
        None => Ok(default.clone()),
    }
}

/// Run one cycle for the pair named in `payload`.
pub async fn handle_event(
    config: &PipelineConfig,
    source: &dyn QuoteSource,
    payload: &Value,
) -> Result<EventResponse, IngestError> {
    let pair = resolve_pair(payload, &config.default_pair)?;
    let report = execute_cycle(config, source, &pair).await?;
    Ok(EventResponse {
        status_code: 200,
        body: format!(
            "{pair}: {} inserted, {} skipped",
            report.inserted_count, report.skipped_count
        ),
        inserted_count: report.inserted_count,
        skipped_count: report.skipped_count,
    })
}
