//! Test support.

mod helpers;
mod store;

pub(crate) use context::TestContext;
pub(crate) use helpers::{book, catalog_book};
pub(crate) use store::FlakyStore;
