//! Cart service.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf::{
    books::{BookId, BookRef},
    cart::Cart,
};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    domain::{
        cart::errors::CartServiceError,
        ledger::{Edit, Ledger, Revision, Versioned},
    },
    storage::{CART_KEY, KeyValueStore},
};

/// Result of adding a book to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    /// The cart after the call.
    pub cart: Cart,

    /// `false` when the book was already in the cart and nothing changed.
    pub added: bool,

    pub revision: Revision,
}

/// Cart ledger persisted under the `"cart"` storage key.
pub struct StoredCartService {
    ledger: Ledger<Cart>,
}

impl StoredCartService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ledger: Ledger::new(store, CART_KEY),
        }
    }
}

#[async_trait]
impl CartService for StoredCartService {
    async fn load(&self) -> Result<Versioned<Cart>, CartServiceError> {
        self.ledger.load().await
    }

    async fn add(&self, book: BookRef) -> Result<AddOutcome, CartServiceError> {
        let id = book.id.clone();

        let committed = self
            .ledger
            .update::<_, CartServiceError>(move |cart: &mut Cart| {
                if cart.insert(book) {
                    Edit::Changed(true)
                } else {
                    Edit::Unchanged(false)
                }
            })
            .await?;

        if committed.output {
            info!(%id, "added book to cart");
        } else {
            debug!(%id, "book already in cart");
        }

        Ok(AddOutcome {
            cart: committed.value,
            added: committed.output,
            revision: committed.revision,
        })
    }

    async fn remove(&self, id: &BookId) -> Result<Versioned<Cart>, CartServiceError> {
        let committed = self
            .ledger
            .update::<_, CartServiceError>(|cart: &mut Cart| {
                if cart.remove(id) {
                    Edit::Changed(())
                } else {
                    Edit::Unchanged(())
                }
            })
            .await?;

        Ok(Versioned {
            value: committed.value,
            revision: committed.revision,
        })
    }

    async fn clear(&self) -> Result<Revision, CartServiceError> {
        let revision = self.ledger.clear::<CartServiceError>().await?;

        info!(%revision, "cleared cart");

        Ok(revision)
    }

    async fn clear_at(&self, expected: Revision) -> Result<Revision, CartServiceError> {
        let revision = self
            .ledger
            .clear_if::<CartServiceError>(expected)
            .await?
            .ok_or(CartServiceError::Stale { expected })?;

        info!(%revision, "cleared cart");

        Ok(revision)
    }

    async fn total(&self) -> Result<Decimal, CartServiceError> {
        Ok(self.load().await?.value.total())
    }

    async fn revision(&self) -> Revision {
        self.ledger.revision().await
    }
}

#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Current cart, read from storage on first use. Malformed stored data
    /// loads as an empty cart.
    async fn load(&self) -> Result<Versioned<Cart>, CartServiceError>;

    /// Add a book unless a book with the same id is already present.
    async fn add(&self, book: BookRef) -> Result<AddOutcome, CartServiceError>;

    /// Remove a book. Removing a book that is not in the cart succeeds.
    async fn remove(&self, id: &BookId) -> Result<Versioned<Cart>, CartServiceError>;

    /// Empty the cart and delete it from storage.
    async fn clear(&self) -> Result<Revision, CartServiceError>;

    /// Empty the cart, provided it is still at the `expected` revision.
    async fn clear_at(&self, expected: Revision) -> Result<Revision, CartServiceError>;

    /// Sum of `price * quantity`; unusable prices count as zero.
    async fn total(&self) -> Result<Decimal, CartServiceError>;

    /// Revision of the last committed change.
    async fn revision(&self) -> Revision;
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        storage::{KeyValueStore, MemoryStore, MockKeyValueStore, StorageError},
        test::{FlakyStore, TestContext, book},
    };

    use super::*;

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.iter().map(|book| book.id.as_str()).collect()
    }

    #[tokio::test]
    async fn adding_same_book_twice_keeps_one_entry() -> TestResult {
        let ctx = TestContext::new();

        let first = ctx.carts.add(book("dune", 120_000)).await?;
        let second = ctx.carts.add(book("dune", 120_000)).await?;

        assert!(first.added);
        assert!(!second.added, "second add must report de-duplication");
        assert_eq!(ids(&second.cart), ["dune"]);
        assert_eq!(second.revision, first.revision, "no-op add must not commit");

        Ok(())
    }

    #[tokio::test]
    async fn added_books_have_quantity_one() -> TestResult {
        let ctx = TestContext::new();

        let mut snapshot = book("dune", 120_000);
        snapshot.quantity = 5;

        let outcome = ctx.carts.add(snapshot).await?;

        assert_eq!(outcome.cart.get(&BookId::from("dune")).map(|b| b.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn removing_absent_book_is_a_no_op() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add(book("dune", 1)).await?;
        let before = ctx.carts.load().await?;

        let after = ctx.carts.remove(&BookId::from("emma")).await?;

        assert_eq!(after, before);

        Ok(())
    }

    #[tokio::test]
    async fn remove_persists() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add(book("dune", 1)).await?;
        ctx.carts.add(book("emma", 2)).await?;
        ctx.carts.remove(&BookId::from("dune")).await?;

        let reopened = ctx.restart();

        assert_eq!(ids(&reopened.carts.load().await?.value), ["emma"]);

        Ok(())
    }

    #[tokio::test]
    async fn clear_survives_restart() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add(book("dune", 1)).await?;
        ctx.carts.clear().await?;

        assert!(ctx.carts.load().await?.value.is_empty());

        let reopened = ctx.restart();

        assert!(reopened.carts.load().await?.value.is_empty());
        assert_eq!(ctx.store.read(CART_KEY).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn total_treats_invalid_price_as_zero() -> TestResult {
        let store = MemoryStore::new();

        store
            .write(
                CART_KEY,
                serde_json::to_vec(&json!([
                    {"id": "a", "name": "A", "price": 10_000, "quantity": 1},
                    {"id": "b", "name": "B", "price": "invalid", "quantity": 2},
                ]))?,
            )
            .await?;

        let carts = StoredCartService::new(Arc::new(store));

        assert_eq!(carts.total().await?, Decimal::from(10_000));

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_cart_loads_empty_and_is_overwritten() -> TestResult {
        let store = MemoryStore::new();
        store.write(CART_KEY, b"[{\"id\": ".to_vec()).await?;

        let carts = StoredCartService::new(Arc::new(store.clone()));

        assert!(carts.load().await?.value.is_empty());

        carts.add(book("dune", 1)).await?;

        let stored = store.read(CART_KEY).await?.unwrap_or_default();

        assert_eq!(ids(&Cart::from_slice(&stored).value), ["dune"]);

        Ok(())
    }

    #[tokio::test]
    async fn legacy_entries_survive_the_next_add() -> TestResult {
        let store = MemoryStore::new();

        store
            .write(
                CART_KEY,
                serde_json::to_vec(&json!([
                    {
                        "id": "66f1",
                        "name": null,
                        "price": "120000",
                        "author": "Frank Herbert",
                        "image": ["https://img.example/dune.jpg"],
                        "quantity": 1,
                    },
                    {"name": "no id", "price": "1"},
                ]))?,
            )
            .await?;

        let carts = StoredCartService::new(Arc::new(store.clone()));

        carts.add(book("emma", 80_000)).await?;

        let stored = Cart::from_slice(&store.read(CART_KEY).await?.unwrap_or_default());

        assert_eq!(ids(&stored.value), ["66f1", "emma"]);
        assert_eq!(
            stored.value.get(&BookId::from("66f1")).and_then(|b| b.image.as_deref()),
            Some("https://img.example/dune.jpg")
        );
        assert_eq!(stored.value.total(), Decimal::from(200_000));

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_rolls_back() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add(book("dune", 1)).await?;
        let before = ctx.carts.load().await?;

        ctx.store.fail_writes(true);

        let result = ctx.carts.add(book("emma", 2)).await;

        assert!(
            matches!(result, Err(CartServiceError::Storage(StorageError::Unavailable { .. }))),
            "expected Storage error, got {result:?}"
        );

        ctx.store.fail_writes(false);

        assert_eq!(ctx.carts.load().await?, before);

        Ok(())
    }

    #[tokio::test]
    async fn failed_clear_keeps_contents() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add(book("dune", 1)).await?;
        ctx.store.fail_deletes(true);

        assert!(ctx.carts.clear().await.is_err(), "clear must report failure");
        assert_eq!(ids(&ctx.carts.load().await?.value), ["dune"]);

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_storage_is_reported() {
        let mut store = MockKeyValueStore::new();

        store.expect_read().returning(|key| {
            Err(StorageError::unavailable(
                key,
                std::io::Error::other("device locked"),
            ))
        });

        let carts = StoredCartService::new(Arc::new(store));

        let result = carts.load().await;

        assert!(
            matches!(result, Err(CartServiceError::Storage(_))),
            "expected Storage error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() -> TestResult {
        let store = FlakyStore::new();
        store.interleave(true);

        let carts = Arc::new(StoredCartService::new(Arc::new(store.clone())));

        let names: Vec<String> = (0..16).map(|n| format!("book-{n}")).collect();

        let outcomes = join_all(names.iter().map(|name| carts.add(book(name, 1)))).await;

        for outcome in outcomes {
            assert!(outcome?.added);
        }

        let cart = carts.load().await?;

        assert_eq!(cart.value.len(), names.len());
        assert_eq!(cart.revision.get(), 16);

        Ok(())
    }

    #[tokio::test]
    async fn add_then_remove_apply_in_issue_order() -> TestResult {
        let store = FlakyStore::new();
        store.interleave(true);

        let carts = StoredCartService::new(Arc::new(store));
        let dune = BookId::from("dune");

        let (added, removed) = tokio::join!(carts.add(book("dune", 1)), carts.remove(&dune));

        assert!(added?.added);
        assert!(removed?.value.is_empty());
        assert!(carts.load().await?.value.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_at_refuses_stale_revision() -> TestResult {
        let ctx = TestContext::new();

        let first = ctx.carts.add(book("dune", 1)).await?;
        ctx.carts.add(book("emma", 1)).await?;

        let result = ctx.carts.clear_at(first.revision).await;

        assert!(
            matches!(result, Err(CartServiceError::Stale { expected }) if expected == first.revision),
            "expected Stale, got {result:?}"
        );
        assert_eq!(ctx.carts.load().await?.value.len(), 2);

        Ok(())
    }
}
