use chrono::{DateTime, Utc};

use crate::models::request_params::CandleRequest;

/// Largest `count` the candles endpoint accepts.
pub const MAX_COUNT: u32 = 5000;

/// Formats a window start for the `from` parameter.
///
/// The instant is first aligned to its granularity bucket (UTC midnight for daily
/// candles) and rendered without fractional seconds: `2024-01-03T00:00:00Z`.
pub fn format_from(request: &CandleRequest, from: DateTime<Utc>) -> String {
    request
        .granularity
        .align(from)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// Builds the query string pairs for a candles request.
pub fn construct_params(request: &CandleRequest) -> Vec<(String, String)> {
    let mut query = vec![
        ("count".to_string(), request.count.to_string()),
        ("granularity".to_string(), request.granularity.code().to_string()),
        ("price".to_string(), "M".to_string()),
    ];
    if let Some(from) = request.from {
        query.push(("from".to_string(), format_from(request, from)));
    }
    query
}
