//! Daily FX candle ingestion.
//!
//! A cycle reads the newest stored bar for a pair ([`cursor`]), asks a
//! [`quote_source::providers::QuoteSource`] for everything after it, drops what is
//! already stored ([`gate`]) and writes the rest with their moving averages in one
//! transaction ([`ingest`]). [`cycle`] and [`event`] are the entry points; [`forecast`]
//! scores baseline forecasters on the stored series.

#![deny(missing_docs)]

pub mod config;
pub mod cursor;
pub mod cycle;
pub mod db;
pub mod errors;
pub mod event;
pub mod forecast;
pub mod gate;
pub mod ingest;
pub mod models;
pub mod moving_average;
#[allow(missing_docs)]
pub mod schema;
pub mod store;
