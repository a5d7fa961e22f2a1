use http::StatusCode;
use thiserror::Error;
use tollgate_core::HttpError;
use tollgate_store::StoreError;

/// Errors raised while reading or adjusting balances
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No balance has ever been recorded for the user
    #[error("no balance found for user {user_id}")]
    NotFound { user_id: i64 },

    /// The stored balance is not a number
    #[error("stored balance for user {user_id} is not a number: {value:?}")]
    Format { user_id: i64, value: String },

    /// Adjustment amount is negative or not finite
    #[error("invalid amount {amount}: must be a finite, non-negative number")]
    InvalidAmount { amount: f64 },

    /// Deduction would take the balance below the configured minimum
    #[error("insufficient balance for user {user_id}: balance {balance}, requested {amount}")]
    InsufficientFunds { user_id: i64, balance: f64, amount: f64 },

    /// The adjusted balance would not be a representable number
    #[error("adjusting balance {balance} of user {user_id} by {amount} is out of range")]
    OutOfRange { user_id: i64, balance: f64, amount: f64 },

    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HttpError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidAmount { .. } | Self::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Format { .. } | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::NotFound { .. } => "not_found_error",
            Self::Format { .. } => "format_error",
            Self::InvalidAmount { .. } | Self::OutOfRange { .. } => "invalid_request_error",
            Self::InsufficientFunds { .. } => "insufficient_funds_error",
            Self::Store(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Format { user_id, .. } => format!("stored balance for user {user_id} is not a number"),
            Self::Store(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
