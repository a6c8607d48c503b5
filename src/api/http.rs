//! HTTP client for the tracker server's tRPC endpoints

use super::types::*;
use super::PriceApi;
use crate::alerts::AlertRequest;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const TRPC_PATH: &str = "api/trpc";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `{"result":{"data": ...}}` or `{"error":{"message": ...}}`
#[derive(Debug, Deserialize)]
struct TrpcEnvelope<T> {
    result: Option<TrpcResult<T>>,
    error: Option<TrpcError>,
}

#[derive(Debug, Deserialize)]
struct TrpcResult<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TrpcError {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryInput {
    product_id: i64,
    days: u32,
}

/// [`PriceApi`] backed by the tracker server over HTTP
pub struct HttpPriceApi {
    client: Client,
    base_url: Url,
}

impl HttpPriceApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| AppError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a tRPC procedure, e.g. `prices.getAll`
    fn endpoint(&self, procedure: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = format!("{}/{}/{}", base, TRPC_PATH, procedure);
        Url::parse(&url).map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", url, e)))
    }

    async fn query<T: DeserializeOwned>(&self, procedure: &str, input: Option<String>) -> Result<T> {
        let mut url = self.endpoint(procedure)?;
        if let Some(input) = input {
            url.set_query(Some(&format!("input={}", urlencoding::encode(&input))));
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode(procedure, response).await
    }

    async fn mutate<B: Serialize + ?Sized, T: DeserializeOwned>(&self, procedure: &str, body: &B) -> Result<T> {
        let url = self.endpoint(procedure)?;

        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(procedure, response).await
    }

    async fn decode<T: DeserializeOwned>(procedure: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        unwrap_envelope(procedure, status, &body)
    }
}

fn unwrap_envelope<T: DeserializeOwned>(procedure: &str, status: reqwest::StatusCode, body: &str) -> Result<T> {
    let envelope: TrpcEnvelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(AppError::Serialization(e)),
        Err(_) => {
            return Err(AppError::Remote(format!("{} failed with HTTP {}", procedure, status)));
        }
    };

    if let Some(error) = envelope.error {
        return Err(AppError::Remote(error.message));
    }

    envelope
        .result
        .map(|r| r.data)
        .ok_or_else(|| AppError::Remote(format!("{} returned an empty response", procedure)))
}

#[async_trait]
impl PriceApi for HttpPriceApi {
    #[instrument(skip(self))]
    async fn fetch_all_products(&self) -> Result<Vec<Product>> {
        self.query("prices.getAll", None).await
    }

    #[instrument(skip(self))]
    async fn fetch_last_update_time(&self) -> Result<LastUpdateInfo> {
        self.query("prices.getLastUpdateTime", None).await
    }

    #[instrument(skip(self))]
    async fn trigger_scrape(&self) -> Result<ScrapeOutcome> {
        self.mutate("scraper.updatePrices", &serde_json::json!({})).await
    }

    #[instrument(skip(self, request), fields(product_id = request.product_id))]
    async fn create_alert(&self, request: &AlertRequest) -> Result<()> {
        let _: serde_json::Value = self.mutate("alerts.create", request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_price_history(&self, product_id: i64, days: u32) -> Result<Vec<PriceHistoryRecord>> {
        let input = serde_json::to_string(&HistoryInput { product_id, days })?;
        self.query("prices.getPriceHistory", Some(input)).await
    }
}
