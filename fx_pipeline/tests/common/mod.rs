#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::Mutex,
};

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use fx_pipeline::db::{connection, migrate};
use quote_source::{
    models::{
        candle::{RawCandle, RawMid},
        request_params::CandleRequest,
    },
    providers::{DecodeSnafu, QuoteSource, SourceError, StatusSnafu},
};
use snafu::IntoError;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

/// A complete daily candle at 22:00Z on 2024-01-`day` with the given close.
pub fn candle(day: u32, close: f64) -> RawCandle {
    raw(&format!("2024-01-{day:02}T22:00:00.000000000Z"), close, true)
}

pub fn raw(time: &str, close: f64, complete: bool) -> RawCandle {
    let px = format!("{close:.5}");
    RawCandle {
        time: time.to_string(),
        volume: 100,
        mid: RawMid {
            o: px.clone(),
            h: px.clone(),
            l: px.clone(),
            c: px,
        },
        complete,
    }
}

/// Serves scripted responses in order and records every request.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<RawCandle>, SourceError>>>,
    pub requests: Mutex<Vec<CandleRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, candles: Vec<RawCandle>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(candles));
        self
    }

    pub fn then_status(self, status: u16, message: &str) -> Self {
        let err = StatusSnafu {
            url: "http://stub/candles",
            status,
            message,
        }
        .build();
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Queue a response body that is not valid JSON.
    pub fn then_decode_error(self) -> Self {
        let cause = serde_json::from_str::<serde_json::Value>("{\"candles\": [").unwrap_err();
        let err = DecodeSnafu.into_error(cause);
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<CandleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<RawCandle>, SourceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
