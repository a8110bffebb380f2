//! Persistence operations behind the [`BarStore`] trait.
//!
//! One implementation covers both backends through [`impl_bar_store!`]; they differ only
//! in how a write transaction is opened. SQLite uses `BEGIN IMMEDIATE` so a concurrent
//! cycle waits on the busy timeout instead of failing at commit.

use chrono::NaiveDateTime;
#[cfg(feature = "postgres")]
use diesel::PgConnection;
use diesel::{
    Connection, QueryResult, SqliteConnection,
    dsl::{exists, max},
    prelude::*,
};

use crate::{
    models::{ClosePoint, NewCurrencyBar, NewMovingAverage, NewPrediction},
    schema::{currency_data::dsl as cd, moving_average::dsl as ma, prediction::dsl as pr},
};

/// Rows per INSERT statement, kept well under SQLite's bind-parameter limit.
pub const INSERT_CHUNK: usize = 500;

/// Queries and writes the pipeline needs from a connection.
pub trait BarStore: Connection + Sized {
    /// Run `f` inside a write transaction; an `Err` rolls everything back.
    fn write_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>;

    /// Whether a bar with this key is already stored.
    fn bar_exists(&mut self, pair: &str, timestamp: NaiveDateTime) -> QueryResult<bool>;

    /// Greatest stored timestamp for `pair`.
    fn latest_timestamp(&mut self, pair: &str) -> QueryResult<Option<NaiveDateTime>>;

    /// Insert bars; a duplicate key fails the statement.
    fn insert_bars(&mut self, rows: &[NewCurrencyBar<'_>]) -> QueryResult<usize>;

    /// Up to `limit` closes strictly before `before`, oldest first.
    fn closes_before(
        &mut self,
        pair: &str,
        before: NaiveDateTime,
        limit: i64,
    ) -> QueryResult<Vec<ClosePoint>>;

    /// Every close at or after `since`, oldest first.
    fn closes_since(&mut self, pair: &str, since: NaiveDateTime) -> QueryResult<Vec<ClosePoint>>;

    /// The full close series for `pair`, oldest first.
    fn close_series(&mut self, pair: &str) -> QueryResult<Vec<ClosePoint>>;

    /// Insert moving averages; a duplicate `(bar, window)` fails the statement.
    fn insert_moving_averages(&mut self, rows: &[NewMovingAverage]) -> QueryResult<usize>;

    /// Insert forecaster output.
    fn insert_predictions(&mut self, rows: &[NewPrediction<'_>]) -> QueryResult<usize>;

    /// Number of stored bars for `pair`.
    fn count_bars(&mut self, pair: &str) -> QueryResult<i64>;

    /// Number of stored moving averages for `pair`.
    fn count_moving_averages(&mut self, pair: &str) -> QueryResult<i64>;
}

macro_rules! impl_bar_store {
    ($conn:ty, $begin:ident) => {
        impl BarStore for $conn {
            fn write_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
            where
                F: FnOnce(&mut Self) -> Result<T, E>,
                E: From<diesel::result::Error>,
            {
                self.$begin(f)
            }

            fn bar_exists(&mut self, pair: &str, timestamp: NaiveDateTime) -> QueryResult<bool> {
                diesel::select(exists(
                    cd::currency_data
                        .filter(cd::currency_pair.eq(pair))
                        .filter(cd::timestamp.eq(timestamp)),
                ))
                .get_result(self)
            }

            fn latest_timestamp(&mut self, pair: &str) -> QueryResult<Option<NaiveDateTime>> {
                cd::currency_data
                    .filter(cd::currency_pair.eq(pair))
                    .select(max(cd::timestamp))
                    .get_result(self)
            }

            fn insert_bars(&mut self, rows: &[NewCurrencyBar<'_>]) -> QueryResult<usize> {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(cd::currency_data)
                        .values(chunk)
                        .execute(self)?;
                }
                Ok(inserted)
            }

            fn closes_before(
                &mut self,
                pair: &str,
                before: NaiveDateTime,
                limit: i64,
            ) -> QueryResult<Vec<ClosePoint>> {
                let mut points: Vec<ClosePoint> = cd::currency_data
                    .filter(cd::currency_pair.eq(pair))
                    .filter(cd::timestamp.lt(before))
                    .order(cd::timestamp.desc())
                    .limit(limit)
                    .select((cd::id, cd::timestamp, cd::close))
                    .load(self)?;
                points.reverse();
                Ok(points)
            }

            fn closes_since(
                &mut self,
                pair: &str,
                since: NaiveDateTime,
            ) -> QueryResult<Vec<ClosePoint>> {
                cd::currency_data
                    .filter(cd::currency_pair.eq(pair))
                    .filter(cd::timestamp.ge(since))
                    .order(cd::timestamp.asc())
                    .select((cd::id, cd::timestamp, cd::close))
                    .load(self)
            }

            fn close_series(&mut self, pair: &str) -> QueryResult<Vec<ClosePoint>> {
                cd::currency_data
                    .filter(cd::currency_pair.eq(pair))
                    .order(cd::timestamp.asc())
                    .select((cd::id, cd::timestamp, cd::close))
                    .load(self)
            }

            fn insert_moving_averages(&mut self, rows: &[NewMovingAverage]) -> QueryResult<usize> {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(ma::moving_average)
                        .values(chunk)
                        .execute(self)?;
                }
                Ok(inserted)
            }

            fn insert_predictions(&mut self, rows: &[NewPrediction<'_>]) -> QueryResult<usize> {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(pr::prediction)
                        .values(chunk)
                        .execute(self)?;
                }
                Ok(inserted)
            }

            fn count_bars(&mut self, pair: &str) -> QueryResult<i64> {
                cd::currency_data
                    .filter(cd::currency_pair.eq(pair))
                    .count()
                    .get_result(self)
            }

            fn count_moving_averages(&mut self, pair: &str) -> QueryResult<i64> {
                ma::moving_average
                    .inner_join(cd::currency_data)
                    .filter(cd::currency_pair.eq(pair))
                    .count()
                    .get_result(self)
            }
        }
    };
}

impl_bar_store!(SqliteConnection, immediate_transaction);
#[cfg(feature = "postgres")]
impl_bar_store!(PgConnection, transaction);

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::connection::connect_sqlite;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn memory_store() -> SqliteConnection {
        use diesel_migrations::MigrationHarness;
        let mut conn = connect_sqlite(":memory:").unwrap();
        conn.run_pending_migrations(crate::db::migrate::SQLITE_MIGRATIONS)
            .unwrap();
        conn
    }

    fn bar(pair: &str, day: u32, close: f64) -> NewCurrencyBar<'_> {
        NewCurrencyBar {
            currency_pair: pair,
            timestamp: ts(day),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1,
        }
    }

    #[test]
    fn empty_store_has_no_latest() {
        let mut conn = memory_store();
        assert_eq!(conn.latest_timestamp("EUR/USD").unwrap(), None);
        assert!(!conn.bar_exists("EUR/USD", ts(1)).unwrap());
    }

    #[test]
    fn latest_and_exists_are_scoped_by_pair() {
        let mut conn = memory_store();
        conn.insert_bars(&[bar("EUR/USD", 2, 1.1), bar("EUR/USD", 5, 1.2), bar("GBP/USD", 9, 1.3)])
            .unwrap();

        assert_eq!(conn.latest_timestamp("EUR/USD").unwrap(), Some(ts(5)));
        assert!(conn.bar_exists("EUR/USD", ts(2)).unwrap());
        assert!(!conn.bar_exists("GBP/USD", ts(2)).unwrap());
        assert_eq!(conn.count_bars("GBP/USD").unwrap(), 1);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut conn = memory_store();
        conn.insert_bars(&[bar("EUR/USD", 2, 1.1)]).unwrap();
        let err = conn.insert_bars(&[bar("EUR/USD", 2, 1.5)]).unwrap_err();
        assert!(matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            )
        ));
    }

    #[test]
    fn closes_before_returns_the_tail_in_order() {
        let mut conn = memory_store();
        let rows: Vec<_> = (1..=6).map(|d| bar("EUR/USD", d, d as f64)).collect();
        conn.insert_bars(&rows).unwrap();

        let closes: Vec<f64> = conn
            .closes_before("EUR/USD", ts(5), 3)
            .unwrap()
            .iter()
            .map(|p| p.close)
            .collect();
        assert_eq!(closes, vec![2.0, 3.0, 4.0]);

        let since: Vec<f64> = conn
            .closes_since("EUR/USD", ts(5))
            .unwrap()
            .iter()
            .map(|p| p.close)
            .collect();
        assert_eq!(since, vec![5.0, 6.0]);
    }

    #[test]
    fn rollback_discards_writes() {
        let mut conn = memory_store();
        let res: Result<(), diesel::result::Error> = conn.write_transaction(|c| {
            c.insert_bars(&[bar("EUR/USD", 1, 1.0)])?;
            Err(diesel::result::Error::RollbackTransaction)
        });
        assert!(res.is_err());
        assert_eq!(conn.count_bars("EUR/USD").unwrap(), 0);
    }
}
