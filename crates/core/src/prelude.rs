//! Prelude

pub use crate::{
    books::{BookId, BookRef, Price},
    cart::Cart,
    catalog::{Book, CatalogRecord, CatalogRecordError},
    decode::Decoded,
    favorites::Favorites,
    invoice::{Invoice, InvoiceLine, OrderNumber, TAX_RATE_PERCENT},
};
