pub mod config;
pub mod domain;
pub mod errors;
pub mod manager;
pub mod providers;
pub mod store;

pub use domain::cart::{Cart, CartLine};
pub use domain::product::{Product, ProductId};
pub use errors::{CartError, ProviderError, StoreError};
pub use manager::CartManager;
pub use providers::{ProductCatalog, StockProvider};
pub use store::{CartStore, InMemoryCartStore};
