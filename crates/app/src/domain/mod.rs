//! Bookshelf Domain Concerns

pub mod cart;
pub mod favorites;
pub mod invoice;
pub mod ledger;
