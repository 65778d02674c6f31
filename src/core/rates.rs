//! Exchange rate abstractions and core types

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Short alphabetic currency identifier, e.g. `USD`.
pub type CurrencyCode = String;

/// Local currency units per one unit of the foreign currency, rounded to 2 places.
pub type ExchangeRate = Decimal;

/// Rates for the currencies that were fetched successfully.
pub type RateMapping = BTreeMap<CurrencyCode, ExchangeRate>;

/// All currencies known upstream, keyed by code with a display label.
pub type CurrencyCatalog = BTreeMap<CurrencyCode, String>;

/// Number of fractional digits kept on every exchange rate.
pub const RATE_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
    #[error("invalid exchange rate value: {0}")]
    InvalidRate(String),
}

impl FetchError {
    /// True for connection failures, timeouts and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Rounds half-to-even to [`RATE_DECIMAL_PLACES`] and pins the scale so the
/// value always renders with exactly two fractional digits.
pub fn round_rate(value: Decimal) -> ExchangeRate {
    let mut rounded = value.round_dp(RATE_DECIMAL_PLACES);
    rounded.rescale(RATE_DECIMAL_PLACES);
    rounded
}

/// Trims, upper-cases and de-duplicates currency codes, dropping blanks.
pub fn normalize_codes<I, S>(codes: I) -> BTreeSet<CurrencyCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|code| code.as_ref().trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Source of exchange rates. Both operations absorb every failure: a failed
/// currency is missing from the mapping, a failed catalog fetch is empty.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> RateMapping;
    async fn fetch_catalog(&self) -> CurrencyCatalog;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_rate_keeps_two_places() {
        let rate = round_rate(Decimal::from_str("3.6789").unwrap());
        assert_eq!(rate, Decimal::new(368, 2));
        assert_eq!(rate.to_string(), "3.68");

        let padded = round_rate(Decimal::from_str("3.7").unwrap());
        assert_eq!(padded.scale(), 2);
        assert_eq!(padded.to_string(), "3.70");
    }

    #[test]
    fn test_round_rate_half_to_even() {
        assert_eq!(
            round_rate(Decimal::from_str("2.125").unwrap()).to_string(),
            "2.12"
        );
        assert_eq!(
            round_rate(Decimal::from_str("2.135").unwrap()).to_string(),
            "2.14"
        );
    }

    #[test]
    fn test_normalize_codes() {
        let codes = normalize_codes(["usd", " EUR ", "USD", ""]);
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("USD"));
        assert!(codes.contains("EUR"));
    }

    #[test]
    fn test_fetch_error_classification() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!FetchError::from(json_err).is_transport());
        assert!(!FetchError::MissingField("key").is_transport());
        assert_eq!(
            FetchError::InvalidRate("N/A".to_string()).to_string(),
            "invalid exchange rate value: N/A"
        );
    }
}
