use std::fmt;

use serde::{Deserialize, Serialize};

/// A user's balance as exposed on the wire
///
/// Field names match the JSON existing clients already parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Balance")]
    pub balance: f64,
}

/// Which way an adjustment moves a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Top-up, increases the balance
    Credit,
    /// Deduction, decreases the balance
    Debit,
}

impl Direction {
    /// Signed delta applied to the stored balance
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single balance change request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub user_id: i64,
    /// Magnitude of the change, never negative
    pub amount: f64,
    pub direction: Direction,
}

impl Adjustment {
    pub const fn credit(user_id: i64, amount: f64) -> Self {
        Self {
            user_id,
            amount,
            direction: Direction::Credit,
        }
    }

    pub const fn debit(user_id: i64, amount: f64) -> Self {
        Self {
            user_id,
            amount,
            direction: Direction::Debit,
        }
    }
}
