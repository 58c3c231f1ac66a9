use async_trait::async_trait;

use crate::domain::product::{Product, ProductId};
use crate::errors::ProviderError;

/// Read-only source of per-product available quantity.
#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn available(&self, product_id: ProductId) -> Result<u32, ProviderError>;
}

/// Read-only source of product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Result<Product, ProviderError>;
    async fn products(&self) -> Result<Vec<Product>, ProviderError>;
}
