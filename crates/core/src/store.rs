use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::cart::Cart;
use crate::errors::StoreError;

/// Durable key-value home of the cart snapshot. The whole cart is written
/// wholesale on every save; there is no incremental diffing.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the persisted cart. `None` when no snapshot has been saved yet.
    async fn load(&self) -> Result<Option<Cart>, StoreError>;
    async fn save(&self, cart: &Cart) -> Result<(), StoreError>;
}

/// In-memory store holding the snapshot in its serialized form, so tests
/// exercise the same encode/decode path as the durable backends.
#[derive(Default)]
pub struct InMemoryCartStore {
    snapshot: RwLock<Option<String>>,
}

impl InMemoryCartStore {
    /// Seeds the store with a raw payload, bypassing encoding. Lets tests
    /// stage pre-existing or malformed snapshots.
    pub fn with_raw(payload: impl Into<String>) -> Self {
        Self { snapshot: RwLock::new(Some(payload.into())) }
    }

    pub async fn raw(&self) -> Option<String> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        let snapshot = self.snapshot.read().await;
        match snapshot.as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|error| StoreError::Decode(error.to_string())),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(cart).map_err(|error| StoreError::Encode(error.to_string()))?;
        *self.snapshot.write().await = Some(raw);
        Ok(())
    }
}
