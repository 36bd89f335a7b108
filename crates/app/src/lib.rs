//! Bookshelf application services: device storage, the remote catalog and
//! the cart, favorites and invoice services built on them.

pub mod catalog;
pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod storage;

#[cfg(test)]
mod test;
