//! Test Helpers

use bookshelf::{
    books::{BookId, BookRef, Price},
    catalog::{Book, PLACEHOLDER_IMAGE},
};
use rust_decimal::Decimal;

pub(crate) fn book(id: &str, price: u64) -> BookRef {
    BookRef::new(id, format!("Title {id}"), "Anon", Some(Price::from(price)), None)
}

pub(crate) fn catalog_book(id: &BookId) -> Book {
    Book {
        id: id.clone(),
        title: format!("Title {id}"),
        author: "Anon".to_string(),
        category: "Fiction".to_string(),
        price: Decimal::from(1_000),
        image: PLACEHOLDER_IMAGE.to_string(),
        stock: 1,
        description: None,
    }
}
