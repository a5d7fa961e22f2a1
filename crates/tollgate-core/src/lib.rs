//! Shared types for Tollgate crates

mod error;

pub use error::HttpError;
