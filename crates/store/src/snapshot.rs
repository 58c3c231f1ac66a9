use async_trait::async_trait;
use chrono::Utc;

use trolley_core::{Cart, CartStore, StoreError};

use crate::DbPool;

/// Fixed key the cart snapshot lives under. There is exactly one cart per
/// store; the row is overwritten wholesale on every save.
const CART_SNAPSHOT_KEY: &str = "cart";

pub struct SqliteCartStore {
    pool: DbPool,
}

impl SqliteCartStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM cart_snapshot WHERE key = ?")
                .bind(CART_SNAPSHOT_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| StoreError::Backend(error.to_string()))?;

        match row {
            Some((payload,)) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|error| StoreError::Decode(error.to_string())),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(cart).map_err(|error| StoreError::Encode(error.to_string()))?;

        sqlx::query(
            "INSERT INTO cart_snapshot (key, payload, saved_at) VALUES (?, ?, ?)\n             ON CONFLICT(key) DO UPDATE SET\n                payload = excluded.payload,\n                saved_at = excluded.saved_at",
        )
        .bind(CART_SNAPSHOT_KEY)
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Backend(error.to_string()))?;

        Ok(())
    }
}
