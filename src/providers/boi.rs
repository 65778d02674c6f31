//! Bank of Israel public exchange rate API client.

use crate::core::rates::{
    CurrencyCatalog, CurrencyCode, ExchangeRate, ExchangeRateSource, FetchError, RateMapping,
    round_rate,
};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, instrument};

pub const DEFAULT_BASE_URL: &str = "https://boi.org.il";

const RATE_ENDPOINT: &str = "/PublicApi/GetExchangeRate?key=";
const CATALOG_ENDPOINT: &str = "/PublicApi/GetExchangeRates";

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(rename = "currentExchangeRate")]
    current_exchange_rate: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(rename = "exchangeRates")]
    exchange_rates: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    key: String,
}

pub struct BankOfIsraelProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BankOfIsraelProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("boi-rates/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(BankOfIsraelProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn rate_url(&self, code: &str) -> String {
        format!("{}{}{}", self.base_url, RATE_ENDPOINT, code)
    }

    fn catalog_url(&self) -> String {
        format!("{}{}", self.base_url, CATALOG_ENDPOINT)
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(status = %response.status(), "Received response from {}", url);
        Ok(response.text().await?)
    }

    /// Fetches a single rate, surfacing the failure reason to the caller.
    pub async fn fetch_rate(&self, code: &str) -> Result<ExchangeRate, FetchError> {
        let url = self.rate_url(code);
        debug!("Requesting exchange rate from {}", url);

        let body = self.get_text(&url).await?;
        parse_exchange_rate(&body)
    }

    /// Fetches the catalog, surfacing the failure reason to the caller.
    pub async fn try_fetch_catalog(&self) -> Result<CurrencyCatalog, FetchError> {
        let url = self.catalog_url();
        debug!("Requesting available currencies from {}", url);

        let body = self.get_text(&url).await?;
        parse_catalog(&body)
    }
}

fn parse_exchange_rate(body: &str) -> Result<ExchangeRate, FetchError> {
    let data: RateResponse = serde_json::from_str(body)?;
    let value = data
        .current_exchange_rate
        .ok_or(FetchError::MissingField("currentExchangeRate"))?;

    let raw = match &value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Null => return Err(FetchError::MissingField("currentExchangeRate")),
        other => return Err(FetchError::InvalidRate(other.to_string())),
    };

    let rate = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| FetchError::InvalidRate(raw.clone()))?;
    if rate.is_sign_negative() {
        return Err(FetchError::InvalidRate(raw));
    }

    Ok(round_rate(rate))
}

fn parse_catalog(body: &str) -> Result<CurrencyCatalog, FetchError> {
    let data: CatalogResponse = serde_json::from_str(body)?;
    Ok(data
        .exchange_rates
        .into_iter()
        .map(|entry| (entry.key.clone(), entry.key))
        .collect())
}

#[async_trait]
impl ExchangeRateSource for BankOfIsraelProvider {
    #[instrument(name = "BoiRatesFetch", skip_all, fields(count = codes.len()))]
    async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> RateMapping {
        let mut rates = RateMapping::new();

        // One request in flight at a time.
        for code in codes {
            match self.fetch_rate(code).await {
                Ok(rate) => {
                    debug!(currency = %code, %rate, "Fetched exchange rate");
                    rates.insert(code.clone(), rate);
                }
                Err(e) if e.is_transport() => {
                    error!(currency = %code, error = %e, "Error fetching exchange rate");
                }
                Err(e) => {
                    error!(currency = %code, error = %e, "Error parsing exchange rate");
                }
            }
        }

        rates
    }

    #[instrument(name = "BoiCatalogFetch", skip_all)]
    async fn fetch_catalog(&self) -> CurrencyCatalog {
        match self.try_fetch_catalog().await {
            Ok(catalog) => {
                debug!(count = catalog.len(), "Fetched available currencies");
                catalog
            }
            Err(e) if e.is_transport() => {
                error!(error = %e, "Error fetching available currencies");
                CurrencyCatalog::new()
            }
            Err(e) => {
                error!(error = %e, "Error parsing available currencies");
                CurrencyCatalog::new()
            }
        }
    }
}
