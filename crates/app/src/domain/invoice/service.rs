//! Invoice service.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf::invoice::{Invoice, OrderNumber};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::domain::{cart::CartService, invoice::errors::InvoiceError, ledger::Revision};

/// An invoice together with the cart revision it was computed from.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub invoice: Invoice,
    pub cart_revision: Revision,
}

/// Proof that a checkout was settled and the cart emptied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub order_number: OrderNumber,
    pub total: Decimal,
    pub paid_at: Timestamp,
}

/// Invoices projected from the cart ledger.
pub struct CartInvoiceService {
    carts: Arc<dyn CartService>,
}

impl CartInvoiceService {
    #[must_use]
    pub fn new(carts: Arc<dyn CartService>) -> Self {
        Self { carts }
    }
}

#[async_trait]
impl InvoiceService for CartInvoiceService {
    async fn build(&self) -> Result<Checkout, InvoiceError> {
        let cart = self.carts.load().await?;

        let now = Timestamp::now();
        let order_number = OrderNumber::generate(now, &mut rand::thread_rng());

        Ok(Checkout {
            invoice: Invoice::build(&cart.value, order_number, now),
            cart_revision: cart.revision,
        })
    }

    async fn confirm_payment(&self, checkout: &Checkout) -> Result<PaymentReceipt, InvoiceError> {
        if checkout.invoice.is_empty() {
            return Err(InvoiceError::EmptyCart);
        }

        self.carts.clear_at(checkout.cart_revision).await?;

        let receipt = PaymentReceipt {
            order_number: checkout.invoice.order_number().clone(),
            total: checkout.invoice.total(),
            paid_at: Timestamp::now(),
        };

        info!(order = %receipt.order_number, total = %receipt.total, "payment confirmed");

        Ok(receipt)
    }
}

#[automock]
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Project the current cart into a fresh invoice.
    async fn build(&self) -> Result<Checkout, InvoiceError>;

    /// Settle a checkout by clearing the cart.
    ///
    /// Fails without clearing if the cart is empty or changed after the
    /// checkout was built. A failed clear is reported as a failed payment.
    async fn confirm_payment(&self, checkout: &Checkout) -> Result<PaymentReceipt, InvoiceError>;
}
