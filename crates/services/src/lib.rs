//! HTTP clients for the external storefront services:
//!
//! - **Catalog service** - `GET /products`, `GET /products/{id}`
//! - **Stock service** - `GET /stock/{id}` returning `{"amount": n}`
//!
//! Both are served by the same mock REST API under one base URL. The
//! [`StorefrontClient`] implements the `StockProvider` and `ProductCatalog`
//! traits from `trolley-core`, so the cart manager never sees HTTP.
//!
//! There is no retry policy and no request cancellation: a failed call is
//! reported once through `ProviderError`.

pub mod client;

pub use client::StorefrontClient;
