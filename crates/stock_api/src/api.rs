use log::debug;
use std::error::Error;
use std::fmt;
use serde::de::DeserializeOwned;
use stock_model::{Issuer, SignalRecord, StockRecord};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Anything that can answer the two backend queries the page needs.
#[allow(async_fn_in_trait)]
pub trait StockSource {
    async fn issuers(&self) -> Result<Vec<Issuer>, ApiError>;

    /// `None` means the backend answered with something other than an array,
    /// which the page treats the same as an empty result.
    async fn stock_data(
        &self,
        issuer: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<StockRecord>>, ApiError>;

    /// Same contract as `stock_data`, for the RSI signals endpoint.
    async fn rsi_signals(
        &self,
        issuer: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<SignalRecord>>, ApiError>;
}

#[derive(Clone)]
pub struct StockAPI {
    base_url: String,
    client: reqwest::Client,
    headers: reqwest::header::HeaderMap,
}

impl StockAPI {
    pub fn new(base_url: &str) -> Self {
        let mut reqwest_headers = reqwest::header::HeaderMap::new();
        reqwest_headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        return StockAPI {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            headers: reqwest_headers,
        };
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl StockSource for StockAPI {
    async fn issuers(&self) -> Result<Vec<Issuer>, ApiError> {
        let url = issuers_url(&self.base_url);

        debug!("issuers | url: {}", url);

        // status is not inspected, only whether the body is an issuer list
        let issuers = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?
            .json::<Vec<Issuer>>()
            .await?;

        debug!("issuers | received {} issuers", issuers.len());

        Ok(issuers)
    }

    async fn stock_data(
        &self,
        issuer: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<StockRecord>>, ApiError> {
        let url = stock_data_url(&self.base_url, issuer, from, to);

        debug!("stock_data | url: {}", url);

        let body = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?
            .text()
            .await?;

        parse_stock_data(&body)
    }

    async fn rsi_signals(
        &self,
        issuer: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<SignalRecord>>, ApiError> {
        let url = rsi_signals_url(&self.base_url, issuer, from, to);

        debug!("rsi_signals | url: {}", url);

        let body = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?
            .text()
            .await?;

        parse_rows(&body)
    }
}

pub fn issuers_url(base_url: &str) -> String {
    format!("{}/api/issuers", base_url)
}

/// Query values go into the URL exactly as given, the backend validates them.
pub fn stock_data_url(base_url: &str, issuer: &str, from: &str, to: &str) -> String {
    format!(
        "{}/api/getStockData?issuer={}&from={}&to={}",
        base_url, issuer, from, to
    )
}

pub fn rsi_signals_url(base_url: &str, issuer: &str, from: &str, to: &str) -> String {
    format!(
        "{}/api/getRSISignals?issuer={}&from={}&to={}",
        base_url, issuer, from, to
    )
}

pub fn parse_stock_data(body: &str) -> Result<Option<Vec<StockRecord>>, ApiError> {
    parse_rows(body)
}

/// A JSON array becomes `Some(rows)`, any other JSON value (the backend's
/// `{"error": ...}` replies included) becomes `None`.
pub fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Option<Vec<T>>, ApiError> {
    let json: serde_json::Value = serde_json::from_str(body)?;
    if !json.is_array() {
        debug!("parse_rows | body is not an array");
        return Ok(None);
    }
    let rows: Vec<T> = serde_json::from_value(json)?;
    Ok(Some(rows))
}

#[derive(Debug)]
pub enum ApiError {
    Request(reqwest::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Request(e) => write!(f, "Request error: {}", e),
            ApiError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Request(e) => Some(e),
            ApiError::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> ApiError {
        ApiError::Request(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> ApiError {
        ApiError::Decode(err)
    }
}
