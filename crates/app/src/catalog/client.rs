//! HTTP catalog client.

use std::time::Duration;

use async_trait::async_trait;
use bookshelf::{
    books::BookId,
    catalog::{Book, CatalogRecord},
};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CatalogClient, CatalogError};

/// Catalog used when none is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://bookshelf-be.onrender.com";

/// Configuration for connecting to the catalog service.
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// Service address, e.g. `"https://bookshelf-be.onrender.com"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// [`CatalogClient`] talking to the catalog's JSON API.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    http: Client,
}

impl HttpCatalogClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url)
    }

    fn book_url(&self, id: &BookId) -> String {
        format!("{}/api/books/{id}", self.base_url)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        let response = self.http.get(self.books_url()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogError::UnexpectedResponse(format!(
                "list request failed with status {status}: {text}"
            )));
        }

        let body: Value = response.json().await?;

        parse_books(body)
    }

    async fn get_book(&self, id: &BookId) -> Result<Book, CatalogError> {
        let response = self.http.get(self.book_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.clone()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogError::UnexpectedResponse(format!(
                "book request failed with status {status}: {text}"
            )));
        }

        let body: Value = response.json().await?;

        debug!(%id, "fetched catalog book");

        parse_book(id, body)
    }
}

/// Normalize a list response, skipping records that cannot be referenced.
pub(crate) fn parse_books(body: Value) -> Result<Vec<Book>, CatalogError> {
    let Value::Array(records) = body else {
        return Err(CatalogError::UnexpectedResponse(
            "expected a list of books".to_string(),
        ));
    };

    let mut books = Vec::with_capacity(records.len());

    for (idx, value) in records.into_iter().enumerate() {
        let book = serde_json::from_value::<CatalogRecord>(value)
            .map_err(|error| error.to_string())
            .and_then(|record| Book::from_record(record).map_err(|error| error.to_string()));

        match book {
            Ok(book) => books.push(book),
            Err(reason) => warn!(idx, %reason, "skipping malformed catalog record"),
        }
    }

    Ok(books)
}

/// Normalize a single-book response.
///
/// The catalog answers unknown ids with `null` rather than a 404.
pub(crate) fn parse_book(id: &BookId, body: Value) -> Result<Book, CatalogError> {
    if body.is_null() {
        return Err(CatalogError::NotFound(id.clone()));
    }

    let record: CatalogRecord = serde_json::from_value(body)
        .map_err(|error| CatalogError::UnexpectedResponse(error.to_string()))?;

    Book::from_record(record).map_err(|error| {
        warn!(%id, %error, "catalog returned unusable record");

        CatalogError::NotFound(id.clone())
    })
}
