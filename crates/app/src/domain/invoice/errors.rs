//! Invoice service errors.

use thiserror::Error;

use crate::domain::cart::CartServiceError;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("cart changed after the invoice was built")]
    StaleInvoice,

    #[error("cart could not be settled")]
    Cart(#[source] CartServiceError),
}

impl From<CartServiceError> for InvoiceError {
    fn from(error: CartServiceError) -> Self {
        match error {
            CartServiceError::Stale { .. } => Self::StaleInvoice,
            other => Self::Cart(other),
        }
    }
}
