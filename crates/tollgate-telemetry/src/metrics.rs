//! Metric names and instrument helpers

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Histogram, Meter};

/// Instrumentation scope for every Tollgate instrument
pub const METER_NAME: &str = "tollgate";

// Ledger metric names
pub const LEDGER_ADJUSTMENT_COUNT: &str = "ledger.adjustment.count";
pub const LEDGER_ADJUSTMENT_AMOUNT: &str = "ledger.adjustment.amount";

// Proxy metric names
pub const PROXY_REQUEST_COUNT: &str = "proxy.request.count";
pub const PROXY_UPSTREAM_DURATION: &str = "proxy.upstream.duration";

/// Meter from the global provider; a no-op until telemetry is initialized
pub fn meter() -> Meter {
    opentelemetry::global::meter(METER_NAME)
}

/// Record the time elapsed since `start` on a histogram, in seconds
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
