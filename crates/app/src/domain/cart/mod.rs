//! Cart

pub mod errors;
pub mod service;

pub use errors::CartServiceError;
pub use service::*;
