#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod ledger;
mod types;

pub use error::LedgerError;
pub use ledger::BalanceLedger;
pub use types::{Adjustment, Direction, User};
