use serde::Deserialize;

/// Balance accounting rules
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Lowest balance a deduction may leave behind
    ///
    /// Unset means deductions may overdraw without limit.
    #[serde(default)]
    pub minimum_balance: Option<f64>,
}
