//! Invoice

pub mod errors;
pub mod service;

pub use errors::InvoiceError;
pub use service::*;
