//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON and a
//!   5000ms busy_timeout; [`connection::open`] picks the backend from the URL.
//! - embedded Diesel migrations and runners: [`migrate::run_sqlite`],
//!   [`migrate::run_postgres`] (behind the `postgres` feature) and [`migrate::run_all`]
//!   which dispatches on the URL (`postgres://`, `postgresql://`, or a SQLite path).
//!
//! Example:
//! ```no_run
//! use fx_pipeline::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("fx_pipeline_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```
//!
//! Note: building with the `postgres` feature requires the system libpq.

pub mod connection;
pub mod migrate;
