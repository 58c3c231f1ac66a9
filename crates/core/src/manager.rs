use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::product::ProductId;
use crate::errors::{CartError, StoreError};
use crate::providers::{ProductCatalog, StockProvider};
use crate::store::CartStore;

/// Owns the shopping cart state. Every mutation validates against the stock
/// provider where required and writes the whole cart to the snapshot store
/// on success.
///
/// Mutations of the same product are serialized through a per-product async
/// lock held for the full operation, stock fetch included. Rapid repeated
/// adds therefore observe each other's result instead of racing on a shared
/// pre-mutation read. Mutations of distinct products interleave freely.
pub struct CartManager {
    stock: Arc<dyn StockProvider>,
    catalog: Arc<dyn ProductCatalog>,
    store: Arc<dyn CartStore>,
    cart: RwLock<Cart>,
    mutation_locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl CartManager {
    /// Restores the cart from the snapshot store. An absent snapshot yields
    /// an empty cart; a snapshot that fails to decode is logged and treated
    /// as empty. Backend failures propagate.
    pub async fn restore(
        stock: Arc<dyn StockProvider>,
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn CartStore>,
    ) -> Result<Self, CartError> {
        let cart = match store.load().await {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::default(),
            Err(StoreError::Decode(reason)) => {
                warn!(
                    event_name = "cart.restore.snapshot_discarded",
                    reason = %reason,
                    "persisted cart snapshot failed to decode, starting empty"
                );
                Cart::default()
            }
            Err(error) => return Err(error.into()),
        };

        info!(
            event_name = "cart.restore.completed",
            lines = cart.len(),
            "cart state restored from snapshot store"
        );

        Ok(Self {
            stock,
            catalog,
            store,
            cart: RwLock::new(cart),
            mutation_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Cloned snapshot of the current cart for read-only consumers.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Badge value for a product: quantity in the cart, 0 when absent.
    pub async fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.cart.read().await.quantity_of(product_id)
    }

    /// Adds one unit of a product, appending a new line with amount 1 when
    /// the product is not in the cart yet. The resulting amount must not
    /// exceed the available stock.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let correlation_id = Uuid::new_v4();
        let _guard = self.mutation_lock(product_id).await;

        let available = self.stock.available(product_id).await?;
        let current = self.cart.read().await.quantity_of(product_id);
        let desired = current + 1;

        if desired > available {
            warn!(
                event_name = "cart.add.rejected",
                correlation_id = %correlation_id,
                product_id = %product_id,
                requested = desired,
                available,
                "add rejected: requested amount exceeds stock"
            );
            return Err(CartError::StockExceeded { product_id, requested: desired, available });
        }

        // Catalog metadata is only needed for a brand-new line.
        let new_line = if current == 0 {
            let product = self.catalog.product(product_id).await?;
            Some(CartLine::new(product, 1))
        } else {
            None
        };

        {
            let mut cart = self.cart.write().await;
            match cart.line_mut(product_id) {
                Some(line) => line.amount = desired,
                None => {
                    if let Some(line) = new_line {
                        cart.push(line);
                    }
                }
            }
            self.store.save(&cart).await?;
        }

        info!(
            event_name = "cart.add.completed",
            correlation_id = %correlation_id,
            product_id = %product_id,
            amount = desired,
            "product added to cart"
        );
        Ok(())
    }

    /// Removes a product's line entirely. No stock validation.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let correlation_id = Uuid::new_v4();
        let _guard = self.mutation_lock(product_id).await;

        {
            let mut cart = self.cart.write().await;
            if !cart.remove(product_id) {
                warn!(
                    event_name = "cart.remove.rejected",
                    correlation_id = %correlation_id,
                    product_id = %product_id,
                    "remove rejected: product is not in the cart"
                );
                return Err(CartError::NotInCart(product_id));
            }
            self.store.save(&cart).await?;
        }

        info!(
            event_name = "cart.remove.completed",
            correlation_id = %correlation_id,
            product_id = %product_id,
            "product removed from cart"
        );
        Ok(())
    }

    /// Sets a product's amount to an absolute value. Amounts of zero or less
    /// are a silent no-op; callers drop a line through `remove_product`.
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        if amount <= 0 {
            return Ok(());
        }
        // Values beyond u32 can never be satisfied and fall out as stock-exceeded.
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        let correlation_id = Uuid::new_v4();
        let _guard = self.mutation_lock(product_id).await;

        let available = self.stock.available(product_id).await?;
        if requested > available {
            warn!(
                event_name = "cart.update_amount.rejected",
                correlation_id = %correlation_id,
                product_id = %product_id,
                requested,
                available,
                "amount update rejected: requested amount exceeds stock"
            );
            return Err(CartError::StockExceeded { product_id, requested, available });
        }

        {
            let mut cart = self.cart.write().await;
            match cart.line_mut(product_id) {
                Some(line) => line.amount = requested,
                None => {
                    warn!(
                        event_name = "cart.update_amount.rejected",
                        correlation_id = %correlation_id,
                        product_id = %product_id,
                        "amount update rejected: product is not in the cart"
                    );
                    return Err(CartError::NotInCart(product_id));
                }
            }
            self.store.save(&cart).await?;
        }

        info!(
            event_name = "cart.update_amount.completed",
            correlation_id = %correlation_id,
            product_id = %product_id,
            amount = requested,
            "cart amount updated"
        );
        Ok(())
    }

    async fn mutation_lock(&self, product_id: ProductId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.mutation_locks.lock().await;
            locks.entry(product_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}
