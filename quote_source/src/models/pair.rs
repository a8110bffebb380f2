//! Currency pair identifiers.
//!
//! The store keeps pairs as `"EUR/USD"` while the quote provider addresses them as
//! instruments (`"EUR_USD"`). [`CurrencyPair`] accepts either spelling and renders both.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairParseError {
    #[error("currency pair is empty")]
    Empty,

    #[error("currency pair {input:?} must look like EUR/USD or EUR_USD")]
    Shape { input: String },

    #[error("currency code {code:?} must be three ASCII letters")]
    Code { code: String },
}

/// A base/quote currency pair such as EUR/USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Result<Self, PairParseError> {
        Ok(Self {
            base: parse_code(base)?,
            quote: parse_code(quote)?,
        })
    }

    /// Provider instrument name, e.g. `EUR_USD`.
    pub fn instrument(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }
}

fn parse_code(code: &str) -> Result<String, PairParseError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PairParseError::Code { code: code.to_string() });
    }
    Ok(code.to_ascii_uppercase())
}

impl FromStr for CurrencyPair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PairParseError::Empty);
        }
        let (base, quote) = s
            .split_once('/')
            .or_else(|| s.split_once('_'))
            .ok_or_else(|| PairParseError::Shape { input: s.to_string() })?;
        Self::new(base, quote)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = PairParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_store_and_instrument_spellings() {
        let slash: CurrencyPair = "EUR/USD".parse().unwrap();
        let underscore: CurrencyPair = "eur_usd".parse().unwrap();
        assert_eq!(slash, underscore);
        assert_eq!(slash.to_string(), "EUR/USD");
        assert_eq!(slash.instrument(), "EUR_USD");
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert_eq!("".parse::<CurrencyPair>(), Err(PairParseError::Empty));
        assert!(matches!(
            "EURUSD".parse::<CurrencyPair>(),
            Err(PairParseError::Shape { .. })
        ));
        assert!(matches!(
            "EU/USD".parse::<CurrencyPair>(),
            Err(PairParseError::Code { .. })
        ));
        assert!(matches!(
            "EUR/U5D".parse::<CurrencyPair>(),
            Err(PairParseError::Code { .. })
        ));
    }

    #[test]
    fn serde_uses_the_store_spelling() {
        let pair: CurrencyPair = serde_json::from_str("\"GBP_JPY\"").unwrap();
        assert_eq!(serde_json::to_string(&pair).unwrap(), "\"GBP/JPY\"");
    }
}
