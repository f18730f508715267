use std::time::Duration;

use log::*;
use osync_common::Secret;
use reqwest::Client;
use serde::Deserialize;

use crate::ZipTaxError;

/// Attempts made before a connection-level failure is surfaced.
pub const MAX_ATTEMPTS: u32 = 3;
/// Per-attempt request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ZIP_TAX_URL: &str = "https://api.zip-tax.com/request/v40";

#[derive(Clone)]
pub struct ZipTaxApi {
    api_key: Secret<String>,
    base_url: String,
    client: Client,
}

#[derive(Deserialize)]
struct ZipTaxResponse {
    results: Vec<ZipTaxResult>,
}

#[derive(Deserialize)]
struct ZipTaxResult {
    #[serde(rename = "taxSales")]
    tax_sales: f64,
}

impl ZipTaxApi {
    pub fn new(api_key: Secret<String>) -> Result<Self, ZipTaxError> {
        Self::with_options(api_key, ZIP_TAX_URL.to_string(), REQUEST_TIMEOUT)
    }

    /// Overrides the endpoint and the per-attempt timeout.
    pub fn with_options(api_key: Secret<String>, base_url: String, timeout: Duration) -> Result<Self, ZipTaxError> {
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| ZipTaxError::Initialization(e.to_string()))?;
        Ok(Self { api_key, base_url, client })
    }

    /// Fetches the sales-tax rate for the given postal code (truncated to 5 digits).
    ///
    /// Connection failures and timeouts are retried up to [`MAX_ATTEMPTS`] times; any other failure is returned
    /// without retrying.
    pub async fn tax_rate(&self, postal_code: &str) -> Result<f64, ZipTaxError> {
        let postal_code = normalize_postal_code(postal_code);
        let params = [("key", self.api_key.reveal().as_str()), ("postalcode", postal_code)];
        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let result = self.client.get(&self.base_url).query(&params).send().await;
            let response = match result {
                Ok(r) => r,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!("Tax-rate lookup attempt {attempt}/{MAX_ATTEMPTS} for {postal_code} failed: {e}");
                    last_error = e.to_string();
                    continue;
                },
                Err(e) => return Err(ZipTaxError::Response(e.to_string())),
            };
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                return Err(ZipTaxError::Response(format!("Error {status}. {message}")));
            }
            let body = response.json::<ZipTaxResponse>().await.map_err(|e| ZipTaxError::Response(e.to_string()))?;
            let rate = body.results.first().ok_or_else(|| ZipTaxError::NoResults(postal_code.to_string()))?.tax_sales;
            debug!("Sales-tax rate for {postal_code}: {rate}");
            return Ok(rate);
        }
        Err(ZipTaxError::Connection(last_error))
    }
}

/// Zip-tax only understands 5-digit zip codes, so longer values (ZIP+4 and friends) are truncated to their
/// first five characters, on a character boundary.
fn normalize_postal_code(postal_code: &str) -> &str {
    match postal_code.char_indices().nth(5) {
        Some((index, _)) => &postal_code[..index],
        None => postal_code,
    }
}
