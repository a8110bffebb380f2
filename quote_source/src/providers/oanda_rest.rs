//! OANDA v20 REST candles endpoint.
//!
//! `GET {base}/instruments/{instrument}/candles` with bearer authentication and the
//! query parameters `count`, `granularity`, `price=M` and an optional `from`.

pub mod config;
pub mod params;
pub mod provider;
pub mod response;

pub use config::OandaConfig;
pub use provider::OandaProvider;
