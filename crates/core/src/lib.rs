//! Bookshelf
//!
//! Domain values for a personal book storefront: the locally cached cart and
//! favorites collections, catalog record normalization and the checkout
//! invoice projection. Nothing in this crate performs I/O.

pub mod books;
pub mod cart;
pub mod catalog;
pub mod decode;
pub mod favorites;
pub mod invoice;
pub mod prelude;
pub mod scan;
