//! One ingestion cycle for one pair: cursor, fetch, ingest.

use quote_source::{
    models::{
        granularity::Granularity, pair::CurrencyPair,
        request_params::{CandleRequest, DEFAULT_COUNT},
    },
    providers::QuoteSource,
};
use secrecy::ExposeSecret;
use tracing::{error, info};

use crate::{
    config::PipelineConfig,
    cursor,
    db::connection::{self, StoreConnection},
    errors::IngestError,
    ingest::{IngestReport, Ingestor},
    moving_average::WindowSet,
    store::BarStore,
};

/// Per-cycle request and derivation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSettings {
    /// Candle interval requested from the source.
    pub granularity: Granularity,
    /// Candles per request.
    pub count: u32,
    /// Moving-average windows derived for new bars.
    pub windows: WindowSet,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            granularity: Granularity::Daily,
            count: DEFAULT_COUNT,
            windows: WindowSet::default(),
        }
    }
}

/// Fetch everything after the newest stored bar for `pair` and ingest it.
///
/// An empty store bootstraps with the source's most recent `count` candles. The
/// cursor lives in the store, so a failed cycle is retried simply by running again.
#[tracing::instrument(name = "ingestion_cycle", skip_all, fields(pair = %pair))]
pub async fn run_ingestion_cycle<C: BarStore>(
    conn: &mut C,
    source: &dyn QuoteSource,
    settings: &CycleSettings,
    pair: &CurrencyPair,
) -> Result<IngestReport, IngestError> {
    let latest = cursor::latest_timestamp(conn, pair)?;
    let mut request = CandleRequest::latest(pair.clone(), settings.granularity, settings.count);
    match cursor::next_window_start(latest, settings.granularity) {
        Some(from) => {
            info!(%from, "incremental fetch");
            request = request.since(from);
        }
        None => info!(count = settings.count, "store empty, bootstrap fetch"),
    }

    let raw = source.fetch_candles(&request).await.map_err(|e| {
        error!(window_start = ?request.from, error = %e, "candle fetch failed");
        IngestError::from_source(pair, e)
    })?;
    info!(fetched = raw.len(), "candles fetched");

    Ingestor::new(&settings.windows)
        .ingest(conn, pair, &raw)
        .inspect_err(|e| error!(window_start = ?request.from, error = %e, "ingestion failed"))
}

/// [`run_ingestion_cycle`] on a connection opened from `config` and closed afterwards.
pub async fn execute_cycle(
    config: &PipelineConfig,
    source: &dyn QuoteSource,
    pair: &CurrencyPair,
) -> Result<IngestReport, IngestError> {
    match connection::open(config.database_url.expose_secret())? {
        StoreConnection::Sqlite(mut conn) => {
            run_ingestion_cycle(&mut conn, source, &config.cycle, pair).await
        }
        #[cfg(feature = "postgres")]
        StoreConnection::Postgres(mut conn) => {
            run_ingestion_cycle(&mut conn, source, &config.cycle, pair).await
        }
    }
}
