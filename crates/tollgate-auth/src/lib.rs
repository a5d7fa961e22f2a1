#![allow(clippy::must_use_candidate)]

mod error;
mod gate;

pub use error::AuthError;
pub use gate::{AccessGate, SERVICE_KEY_HEADER};
