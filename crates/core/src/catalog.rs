//! Catalog records
//!
//! The remote catalog returns loosely shaped JSON: images may be a single URL
//! or a list, prices are wrapped in `{"$numberDecimal": ...}`, nested author
//! and category objects may be missing. [`CatalogRecord`] accepts all of that
//! and [`Book::from_record`] is the one place where fallbacks are applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::books::{BookId, BookRef, Price};

/// Image shown when a record has no usable cover.
pub const PLACEHOLDER_IMAGE: &str = "https://bookshelf.invalid/images/placeholder.jpg";

/// Label used for a missing author or category.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Title used for a record without a name.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Errors raised while normalizing a catalog record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogRecordError {
    /// The record carries no identifier and cannot be referenced.
    #[error("catalog record has no id")]
    MissingId,
}

/// A book record as returned by the catalog service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[serde(rename = "_id", default)]
    id: Option<String>,

    #[serde(default)]
    book_name: Option<String>,

    #[serde(default)]
    price: Value,

    #[serde(default)]
    image: Option<ImageField>,

    #[serde(default)]
    cover_url: Option<String>,

    #[serde(default)]
    category: Value,

    #[serde(default)]
    actor: Value,

    #[serde(rename = "actorID", default)]
    actor_id: Value,

    #[serde(default)]
    quantity: Value,

    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ImageField {
    Single(String),
    Many(Vec<Option<String>>),
    Other(Value),
}

/// A normalized catalog book with every display field resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    /// Catalog identifier.
    pub id: BookId,

    /// Title.
    pub title: String,

    /// Author name, or [`UNKNOWN_LABEL`].
    pub author: String,

    /// Category name, or [`UNKNOWN_LABEL`].
    pub category: String,

    /// Unit price, zero when missing or malformed.
    pub price: Decimal,

    /// Cover URL, or [`PLACEHOLDER_IMAGE`].
    pub image: String,

    /// Copies in stock.
    pub stock: u64,

    /// Free-form description.
    pub description: Option<String>,
}

impl Book {
    /// Normalize a raw catalog record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRecordError::MissingId`] when the record has no usable id.
    pub fn from_record(record: CatalogRecord) -> Result<Self, CatalogRecordError> {
        let id = non_blank(record.id).ok_or(CatalogRecordError::MissingId)?;

        let image = record
            .image
            .and_then(first_image)
            .or_else(|| non_blank(record.cover_url))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        let author = nested_name(&record.actor, "actorName")
            .or_else(|| nested_name(&record.actor_id, "actorName"))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let category = nested_name(&record.category, "categoryName")
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let price = Price::from_json(&record.price).map_or(Decimal::ZERO, |price| price.amount());

        Ok(Self {
            id: BookId::new(id),
            title: non_blank(record.book_name).unwrap_or_else(|| UNTITLED_LABEL.to_string()),
            author,
            category,
            price,
            image,
            stock: record.quantity.as_u64().unwrap_or_default(),
            description: non_blank(record.description),
        })
    }

    /// Whether the cover is the placeholder rather than a catalog image.
    #[must_use]
    pub fn has_placeholder_image(&self) -> bool {
        self.image == PLACEHOLDER_IMAGE
    }

    /// Snapshot this book for the cart.
    #[must_use]
    pub fn to_book_ref(&self) -> BookRef {
        let image = (!self.has_placeholder_image()).then(|| self.image.clone());

        BookRef::new(
            self.id.clone(),
            self.title.clone(),
            self.author.clone(),
            Some(Price::from_decimal(self.price)),
            image,
        )
    }
}

impl TryFrom<CatalogRecord> for Book {
    type Error = CatalogRecordError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

/// Filter books whose title contains `term`, ignoring case.
///
/// A blank term matches everything.
pub fn search<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    let term = term.trim().to_lowercase();

    books
        .iter()
        .filter(|book| term.is_empty() || book.title.to_lowercase().contains(&term))
        .collect()
}

fn first_image(field: ImageField) -> Option<String> {
    match field {
        ImageField::Single(url) => non_blank(Some(url)),
        ImageField::Many(urls) => urls.into_iter().find_map(non_blank),
        ImageField::Other(_) => None,
    }
}

// Unpopulated references arrive as bare id strings rather than objects.
fn nested_name(value: &Value, field: &str) -> Option<String> {
    non_blank(value.get(field).and_then(Value::as_str).map(str::to_string))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != "null")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn book(value: Value) -> Result<Book, Box<dyn std::error::Error>> {
        let record: CatalogRecord = serde_json::from_value(value)?;

        Ok(Book::from_record(record)?)
    }

    #[test]
    fn full_record_normalizes() -> TestResult {
        let book = book(json!({
            "_id": "66f1",
            "bookName": "Dune",
            "price": {"$numberDecimal": "120000"},
            "image": "https://img.example/dune.jpg",
            "category": {"categoryName": "Sci-Fi"},
            "actor": {"actorName": "Frank Herbert"},
            "quantity": 7,
            "description": "Desert planet",
        }))?;

        assert_eq!(book.id, BookId::from("66f1"));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.category, "Sci-Fi");
        assert_eq!(book.price, Decimal::from(120_000));
        assert_eq!(book.image, "https://img.example/dune.jpg");
        assert_eq!(book.stock, 7);
        assert_eq!(book.description.as_deref(), Some("Desert planet"));

        Ok(())
    }

    #[test]
    fn sparse_record_uses_fallbacks() -> TestResult {
        let book = book(json!({"_id": "66f2", "image": null, "category": null}))?;

        assert_eq!(book.title, UNTITLED_LABEL);
        assert_eq!(book.author, UNKNOWN_LABEL);
        assert_eq!(book.category, UNKNOWN_LABEL);
        assert_eq!(book.price, Decimal::ZERO);
        assert_eq!(book.image, PLACEHOLDER_IMAGE);
        assert_eq!(book.stock, 0);
        assert!(book.has_placeholder_image());

        Ok(())
    }

    #[test]
    fn image_array_uses_first_usable_entry() -> TestResult {
        let book = book(json!({
            "_id": "66f3",
            "image": ["", null, "https://img.example/a.jpg", "https://img.example/b.jpg"],
        }))?;

        assert_eq!(book.image, "https://img.example/a.jpg");

        Ok(())
    }

    #[test]
    fn empty_image_array_falls_back_to_cover_url() -> TestResult {
        let book = book(json!({
            "_id": "66f4",
            "image": [],
            "coverUrl": "https://img.example/cover.jpg",
        }))?;

        assert_eq!(book.image, "https://img.example/cover.jpg");

        Ok(())
    }

    #[test]
    fn literal_null_string_image_is_placeholder() -> TestResult {
        let book = book(json!({"_id": "66f5", "image": "null"}))?;

        assert_eq!(book.image, PLACEHOLDER_IMAGE);

        Ok(())
    }

    #[test]
    fn unexpected_image_shape_is_placeholder() -> TestResult {
        let book = book(json!({"_id": "66f6", "image": {"url": "x"}}))?;

        assert_eq!(book.image, PLACEHOLDER_IMAGE);

        Ok(())
    }

    #[test]
    fn legacy_actor_field_is_used() -> TestResult {
        let book = book(json!({"_id": "66f7", "actorID": {"actorName": "Ursula K. Le Guin"}}))?;

        assert_eq!(book.author, "Ursula K. Le Guin");

        Ok(())
    }

    #[test]
    fn unpopulated_references_are_unknown() -> TestResult {
        let book = book(json!({"_id": "66fb", "category": "c-17", "actor": "a-3"}))?;

        assert_eq!(book.author, UNKNOWN_LABEL);
        assert_eq!(book.category, UNKNOWN_LABEL);

        Ok(())
    }

    #[test]
    fn plain_numeric_price_is_accepted() -> TestResult {
        let book = book(json!({"_id": "66f8", "price": 56000}))?;

        assert_eq!(book.price, Decimal::from(56_000));

        Ok(())
    }

    #[test]
    fn malformed_price_is_zero() -> TestResult {
        let book = book(json!({"_id": "66f9", "price": {"$numberDecimal": "abc"}}))?;

        assert_eq!(book.price, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn missing_id_is_rejected() -> TestResult {
        let record: CatalogRecord = serde_json::from_value(json!({"bookName": "Orphan"}))?;

        assert_eq!(
            Book::from_record(record),
            Err(CatalogRecordError::MissingId)
        );

        Ok(())
    }

    #[test]
    fn book_ref_snapshot_omits_placeholder() -> TestResult {
        let book = book(json!({
            "_id": "66fa",
            "bookName": "Dune",
            "price": {"$numberDecimal": "120000"},
        }))?;

        let snapshot = book.to_book_ref();

        assert_eq!(snapshot.id, book.id);
        assert_eq!(snapshot.name, "Dune");
        assert_eq!(snapshot.unit_price(), Decimal::from(120_000));
        assert_eq!(snapshot.image, None);
        assert_eq!(snapshot.quantity, 1);

        Ok(())
    }

    #[test]
    fn search_is_case_insensitive() -> TestResult {
        let books = vec![
            book(json!({"_id": "1", "bookName": "Dune"}))?,
            book(json!({"_id": "2", "bookName": "Dune Messiah"}))?,
            book(json!({"_id": "3", "bookName": "Neuromancer"}))?,
        ];

        let found: Vec<&str> = search(&books, "  dUNE ")
            .into_iter()
            .map(|book| book.id.as_str())
            .collect();

        assert_eq!(found, ["1", "2"]);
        assert_eq!(search(&books, "").len(), 3);

        Ok(())
    }
}
