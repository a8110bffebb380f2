mod common;
use common::{ScriptedSource, candle, setup_db};

use chrono::{TimeZone, Utc};
use fx_pipeline::config::PipelineConfig;
use fx_pipeline::cycle::{CycleSettings, execute_cycle, run_ingestion_cycle};
use fx_pipeline::errors::{ErrorKind, IngestError};
use fx_pipeline::event::handle_event;
use fx_pipeline::moving_average::WindowSet;
use fx_pipeline::store::BarStore;
use quote_source::models::pair::CurrencyPair;
use quote_source::providers::oanda_rest::OandaConfig;
use secrecy::SecretString;
use serde_json::json;

fn eur_usd() -> CurrencyPair {
    "EUR/USD".parse().unwrap()
}

fn settings() -> CycleSettings {
    CycleSettings {
        count: 3,
        windows: WindowSet::new([2]).unwrap(),
        ..CycleSettings::default()
    }
}

fn config(database_url: &str) -> PipelineConfig {
    PipelineConfig {
        source: OandaConfig::new(SecretString::new("test-key".into())),
        database_url: SecretString::new(database_url.into()),
        cycle: settings(),
        default_pair: eur_usd(),
    }
}

#[tokio::test]
async fn empty_store_bootstraps_then_fetches_incrementally() {
    let (_db, mut conn) = setup_db();
    let source = ScriptedSource::new()
        .then_ok(vec![candle(2, 1.10), candle(3, 1.12), candle(4, 1.14)])
        .then_ok(vec![candle(5, 1.16)]);

    let first = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();
    assert_eq!(first.inserted_count, 3);
    assert_eq!(first.moving_average_count, 2);

    let second = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();
    assert_eq!(second.inserted_count, 1);
    assert_eq!(second.moving_average_count, 1);

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].from, None);
    assert_eq!(requests[0].count, 3);
    assert_eq!(
        requests[1].from,
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 22, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn source_failure_leaves_the_cursor_in_place() {
    let (_db, mut conn) = setup_db();
    let source = ScriptedSource::new()
        .then_ok(vec![candle(2, 1.10)])
        .then_status(503, "maintenance")
        .then_ok(vec![candle(3, 1.11)]);

    run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();

    let err = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::SourceUnavailable { .. }));
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    assert_eq!(conn.count_bars("EUR/USD").unwrap(), 1);

    let retry = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();
    assert_eq!(retry.inserted_count, 1);

    let requests = source.requests();
    assert_eq!(requests[1].from, requests[2].from);
}

#[tokio::test]
async fn undecodable_payload_is_a_malformed_record() {
    let (_db, mut conn) = setup_db();
    let source = ScriptedSource::new()
        .then_decode_error()
        .then_ok(vec![candle(2, 1.10)]);

    let err = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::MalformedPayload { ref pair, .. } if *pair == eur_usd()
    ));
    assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    assert_eq!(conn.count_bars("EUR/USD").unwrap(), 0);

    let retry = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();
    assert_eq!(retry.inserted_count, 1);
    assert_eq!(source.requests()[1].from, None);
}

#[tokio::test]
async fn overlapping_window_counts_skips() {
    let (_db, mut conn) = setup_db();
    let source = ScriptedSource::new()
        .then_ok(vec![candle(2, 1.10), candle(3, 1.11)])
        .then_ok(vec![candle(3, 1.11), candle(4, 1.12)]);

    run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();
    let report = run_ingestion_cycle(&mut conn, &source, &settings(), &eur_usd())
        .await
        .unwrap();

    assert_eq!(report.inserted_count, 1);
    assert_eq!(report.skipped_count, 1);
}

#[tokio::test]
async fn execute_cycle_opens_its_own_connection() {
    let (db, mut conn) = setup_db();
    let source = ScriptedSource::new().then_ok(vec![candle(2, 1.10), candle(3, 1.11)]);

    let report = execute_cycle(&config(&db.path), &source, &eur_usd())
        .await
        .unwrap();

    assert_eq!(report.inserted_count, 2);
    assert_eq!(conn.count_bars("EUR/USD").unwrap(), 2);
}

#[tokio::test]
async fn event_names_the_pair_and_reports_counts() {
    let (db, mut conn) = setup_db();
    let source = ScriptedSource::new()
        .then_ok(vec![candle(2, 150.10)])
        .then_ok(vec![candle(2, 150.10)]);
    let cfg = config(&db.path);
    let payload = json!({ "currency_pair": "USD_JPY" });

    let first = handle_event(&cfg, &source, &payload).await.unwrap();
    assert_eq!(first.status_code, 200);
    assert_eq!(first.inserted_count, 1);
    assert_eq!(first.skipped_count, 0);

    let second = handle_event(&cfg, &source, &payload).await.unwrap();
    assert_eq!(second.inserted_count, 0);
    assert_eq!(second.skipped_count, 1);

    assert_eq!(conn.count_bars("USD/JPY").unwrap(), 1);
    assert_eq!(source.requests()[0].pair.instrument(), "USD_JPY");
}

#[tokio::test]
async fn event_with_bad_pair_is_a_configuration_error() {
    let (db, _conn) = setup_db();
    let source = ScriptedSource::new();

    let err = handle_event(&config(&db.path), &source, &json!({ "currency_pair": "EURUSD!" }))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(source.requests().is_empty());
}
