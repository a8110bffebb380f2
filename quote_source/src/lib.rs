//! Quote retrieval for daily currency-pair candles.
//!
//! - [`models`] holds the vendor-agnostic types: [`models::pair::CurrencyPair`],
//!   [`models::granularity::Granularity`], the raw wire record
//!   [`models::candle::RawCandle`] and the canonical [`models::bar::CurrencyBar`].
//! - [`normalize`] turns one raw record into a canonical bar.
//! - [`providers`] defines the [`providers::QuoteSource`] trait and the OANDA REST
//!   implementation.

pub mod models;
pub mod normalize;
pub mod providers;
