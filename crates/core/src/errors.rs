use thiserror::Error;

use crate::domain::product::ProductId;

/// Failures talking to the external catalog and stock services.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("product {0} not found in catalog")]
    ProductNotFound(ProductId),
    #[error("request to `{endpoint}` returned status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("response decode failure: {0}")]
    Decode(String),
}

/// Failures reading or writing the persisted cart snapshot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("snapshot backend failure: {0}")]
    Backend(String),
    #[error("snapshot decode failure: {0}")]
    Decode(String),
    #[error("snapshot encode failure: {0}")]
    Encode(String),
}

/// Outcome kinds for cart operations. Callers branch on the kind; the view
/// layer renders `user_notice()` as the transient message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("requested {requested} of product {product_id} but only {available} in stock")]
    StockExceeded { product_id: ProductId, requested: u32, available: u32 },
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CartError {
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::StockExceeded { .. } => "Requested quantity is not available in stock.",
            Self::NotInCart(_) => "The product is not in the cart.",
            Self::Provider(_) | Self::Store(_) => {
                "Something went wrong while updating the cart. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{CartError, ProviderError, StoreError};

    #[test]
    fn stock_exceeded_has_user_safe_notice() {
        let error = CartError::StockExceeded {
            product_id: ProductId(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(error.user_notice(), "Requested quantity is not available in stock.");
    }

    #[test]
    fn provider_failures_map_to_generic_notice() {
        let error = CartError::from(ProviderError::Transport("connection refused".to_owned()));
        assert_eq!(
            error.user_notice(),
            "Something went wrong while updating the cart. Please try again."
        );
    }

    #[test]
    fn store_failures_map_to_generic_notice() {
        let error = CartError::from(StoreError::Backend("disk full".to_owned()));
        assert_eq!(
            error.user_notice(),
            "Something went wrong while updating the cart. Please try again."
        );
    }
}
