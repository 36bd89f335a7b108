//! Favorites service.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf::{books::BookId, catalog::Book, favorites::Favorites};
use futures::future::join_all;
use mockall::automock;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogClient,
    domain::{
        favorites::errors::FavoritesServiceError,
        ledger::{Edit, Ledger, Revision, Versioned},
    },
    storage::{FAVORITES_KEY, KeyValueStore},
};

/// Result of toggling a favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggled {
    /// Whether the book is a favorite after the call.
    pub favorite: bool,

    pub favorites: Favorites,

    pub revision: Revision,
}

/// Favorite books resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Hydration {
    /// Books that could be fetched, in favorites order.
    pub books: Vec<Book>,

    /// Ids whose fetch failed, in favorites order.
    pub failed: SmallVec<[BookId; 4]>,

    /// Favorites revision the hydration was computed from.
    pub revision: Revision,
}

impl Hydration {
    /// Number of favorites that could not be fetched.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Favorites set persisted under the `"favorites"` storage key.
pub struct StoredFavoritesService {
    ledger: Ledger<Favorites>,
    catalog: Arc<dyn CatalogClient>,
}

impl StoredFavoritesService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            ledger: Ledger::new(store, FAVORITES_KEY),
            catalog,
        }
    }
}

#[async_trait]
impl FavoritesService for StoredFavoritesService {
    async fn load(&self) -> Result<Versioned<Favorites>, FavoritesServiceError> {
        self.ledger.load().await
    }

    async fn toggle(&self, id: BookId) -> Result<Toggled, FavoritesServiceError> {
        let committed = self
            .ledger
            .update::<_, FavoritesServiceError>(move |favorites: &mut Favorites| {
                Edit::Changed(favorites.toggle(id))
            })
            .await?;

        info!(favorite = committed.output, revision = %committed.revision, "toggled favorite");

        Ok(Toggled {
            favorite: committed.output,
            favorites: committed.value,
            revision: committed.revision,
        })
    }

    async fn is_favorite(&self, id: &BookId) -> Result<bool, FavoritesServiceError> {
        Ok(self.load().await?.value.contains(id))
    }

    async fn hydrate(&self) -> Result<Hydration, FavoritesServiceError> {
        let Versioned {
            value: favorites,
            revision,
        } = self.load().await?;

        let results = join_all(favorites.iter().map(|id| self.catalog.get_book(id))).await;

        let mut books = Vec::with_capacity(results.len());
        let mut failed = SmallVec::new();

        for (id, result) in favorites.iter().zip(results) {
            match result {
                Ok(book) => books.push(book),
                Err(error) => {
                    warn!(%id, %error, "failed to fetch favorite");

                    failed.push(id.clone());
                }
            }
        }

        if failed.is_empty() {
            debug!(count = books.len(), "hydrated favorites");
        } else {
            warn!(
                fetched = books.len(),
                failed = failed.len(),
                "favorites partially hydrated"
            );
        }

        Ok(Hydration {
            books,
            failed,
            revision,
        })
    }

    async fn is_current(&self, hydration: &Hydration) -> bool {
        hydration.revision == self.revision().await
    }

    async fn revision(&self) -> Revision {
        self.ledger.revision().await
    }
}

#[automock]
#[async_trait]
pub trait FavoritesService: Send + Sync {
    /// Current favorites, read from storage on first use.
    async fn load(&self) -> Result<Versioned<Favorites>, FavoritesServiceError>;

    /// Flip the favorite status of a book and persist the result.
    async fn toggle(&self, id: BookId) -> Result<Toggled, FavoritesServiceError>;

    async fn is_favorite(&self, id: &BookId) -> Result<bool, FavoritesServiceError>;

    /// Fetch every favorite from the catalog concurrently. Individual fetch
    /// failures are collected in [`Hydration::failed`] rather than failing
    /// the whole call.
    async fn hydrate(&self) -> Result<Hydration, FavoritesServiceError>;

    /// Whether no favorites change was committed since `hydration` started.
    async fn is_current(&self, hydration: &Hydration) -> bool;

    /// Revision of the last committed change.
    async fn revision(&self) -> Revision;
}
