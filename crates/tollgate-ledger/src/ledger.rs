use tollgate_config::LedgerConfig;
use tollgate_store::{Increment, IncrementOptions, SharedStore, keys, parse_number};
use tollgate_telemetry::{Counter, KeyValue, metrics};

use crate::error::LedgerError;
use crate::types::{Adjustment, Direction, User};

/// Reads and adjusts per-user prepaid balances
///
/// Every adjustment is a single atomic increment on the store, so concurrent
/// top-ups and deductions for the same user always compose.
#[derive(Clone)]
pub struct BalanceLedger {
    store: SharedStore,
    minimum_balance: Option<f64>,
    metrics: LedgerMetrics,
}

#[derive(Clone)]
struct LedgerMetrics {
    adjustments: Counter<u64>,
    amount: Counter<f64>,
}

impl LedgerMetrics {
    fn new() -> Self {
        let meter = metrics::meter();
        Self {
            adjustments: meter
                .u64_counter(metrics::LEDGER_ADJUSTMENT_COUNT)
                .with_description("Applied balance adjustments")
                .build(),
            amount: meter
                .f64_counter(metrics::LEDGER_ADJUSTMENT_AMOUNT)
                .with_description("Total amount moved by balance adjustments")
                .build(),
        }
    }

    fn record(&self, direction: Direction, amount: f64) {
        let attributes = [KeyValue::new("direction", direction.as_str())];
        self.adjustments.add(1, &attributes);
        self.amount.add(amount, &attributes);
    }
}

impl BalanceLedger {
    pub fn new(store: SharedStore, config: &LedgerConfig) -> Self {
        Self {
            store,
            minimum_balance: config.minimum_balance,
            metrics: LedgerMetrics::new(),
        }
    }

    /// Current balance of a user
    ///
    /// Fails with [`LedgerError::NotFound`] rather than reporting zero for a
    /// user that was never topped up.
    pub async fn balance(&self, user_id: i64) -> Result<User, LedgerError> {
        let raw = self
            .store
            .get(&keys::balance_key(user_id))
            .await?
            .ok_or(LedgerError::NotFound { user_id })?;

        let balance = parse_number(&raw).ok_or(LedgerError::Format { user_id, value: raw })?;

        Ok(User { id: user_id, balance })
    }

    /// Apply a credit or debit and return the resulting balance
    ///
    /// A credit on an unknown user opens the balance at zero first. A debit
    /// on an unknown user fails with [`LedgerError::NotFound`]. Debits may
    /// overdraw unless a minimum balance is configured.
    pub async fn adjust(&self, adjustment: Adjustment) -> Result<User, LedgerError> {
        let Adjustment {
            user_id,
            amount,
            direction,
        } = adjustment;

        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let options = match direction {
            Direction::Credit => IncrementOptions {
                create_if_missing: true,
                floor: None,
            },
            Direction::Debit => IncrementOptions {
                create_if_missing: false,
                floor: self.minimum_balance,
            },
        };

        let outcome = self
            .store
            .increment(&keys::balance_key(user_id), direction.signed(amount), options)
            .await?;

        match outcome {
            Increment::Applied(balance) => {
                self.metrics.record(direction, amount);
                tracing::info!(user_id, %direction, amount, balance, "balance adjusted");
                Ok(User { id: user_id, balance })
            }
            Increment::Missing => Err(LedgerError::NotFound { user_id }),
            Increment::Unparseable(value) => {
                tracing::error!(user_id, value = %value, "stored balance is not a number");
                Err(LedgerError::Format { user_id, value })
            }
            Increment::OutOfRange { current } => {
                tracing::warn!(user_id, %direction, amount, balance = current, "adjustment would overflow balance");
                Err(LedgerError::OutOfRange {
                    user_id,
                    balance: current,
                    amount,
                })
            }
            Increment::BelowFloor { current } => {
                tracing::info!(user_id, amount, balance = current, "deduction refused by minimum balance");
                Err(LedgerError::InsufficientFunds {
                    user_id,
                    balance: current,
                    amount,
                })
            }
        }
    }

    /// Add `amount` to a user's balance
    pub async fn credit(&self, user_id: i64, amount: f64) -> Result<User, LedgerError> {
        self.adjust(Adjustment::credit(user_id, amount)).await
    }

    /// Subtract `amount` from a user's balance
    pub async fn debit(&self, user_id: i64, amount: f64) -> Result<User, LedgerError> {
        self.adjust(Adjustment::debit(user_id, amount)).await
    }
}
