use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use trolley_core::config::ServicesConfig;
use trolley_core::{Product, ProductCatalog, ProductId, ProviderError, StockProvider};

/// Stock service wire shape: `{"amount": n}`.
#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: u32,
}

/// Shared HTTP client for the catalog and stock endpoints.
#[derive(Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(config: &ServicesConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, endpoint: &str) -> Result<reqwest::Response, ProviderError> {
        self.http
            .get(endpoint)
            .send()
            .await
            .map_err(|error| ProviderError::Transport(error.to_string()))
    }
}

#[async_trait]
impl StockProvider for StorefrontClient {
    async fn available(&self, product_id: ProductId) -> Result<u32, ProviderError> {
        let endpoint = self.endpoint(&format!("stock/{product_id}"));
        let response = self.get(&endpoint).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus { endpoint, status: status.as_u16() });
        }
        let payload: StockPayload =
            response.json().await.map_err(|error| ProviderError::Decode(error.to_string()))?;
        Ok(payload.amount)
    }
}

#[async_trait]
impl ProductCatalog for StorefrontClient {
    async fn product(&self, product_id: ProductId) -> Result<Product, ProviderError> {
        let endpoint = self.endpoint(&format!("products/{product_id}"));
        let response = self.get(&endpoint).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::ProductNotFound(product_id));
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus { endpoint, status: status.as_u16() });
        }
        response.json().await.map_err(|error| ProviderError::Decode(error.to_string()))
    }

    async fn products(&self) -> Result<Vec<Product>, ProviderError> {
        let endpoint = self.endpoint("products");
        let response = self.get(&endpoint).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus { endpoint, status: status.as_u16() });
        }
        response.json().await.map_err(|error| ProviderError::Decode(error.to_string()))
    }
}
