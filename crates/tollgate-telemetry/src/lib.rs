//! Logging and optional OTLP export for Tollgate

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod export;
mod metadata;
pub mod metrics;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tollgate_config::TelemetryConfig;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use opentelemetry::KeyValue;
pub use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Flushes pending spans and metrics when dropped
///
/// Keep it alive until the server has stopped.
#[must_use = "dropping the guard shuts exporters down immediately"]
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    const fn logging_only() -> Self {
        Self {
            meter_provider: None,
            tracer_provider: None,
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        // The subscriber may already be torn down, so report on stderr
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("tracer provider shutdown failed: {e}");
        }
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("meter provider shutdown failed: {e}");
        }
    }
}

/// Install the global subscriber
///
/// `log_filter` takes `EnvFilter` directives; an unparseable filter falls
/// back to `info`. Spans and metrics are exported only when
/// `telemetry.exporter` is set.
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    let exporting = config.and_then(|telemetry| telemetry.exporter.as_ref().map(|exporter| (telemetry, exporter)));

    let Some((telemetry, exporter)) = exporting else {
        Registry::default().with(fmt_layer.with_filter(filter)).init();
        return Ok(TelemetryGuard::logging_only());
    };

    let resource = metadata::build_resource(telemetry);

    let meter_provider = export::meter_provider(exporter, resource.clone())?;
    global::set_meter_provider(meter_provider.clone());

    let tracer_provider = export::tracer_provider(exporter, &telemetry.tracing, resource)?;
    global::set_tracer_provider(tracer_provider.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer(metrics::METER_NAME));

    Registry::default().with(fmt_layer.and_then(otel_layer).with_filter(filter)).init();

    tracing::info!(
        endpoint = %exporter.endpoint,
        protocol = ?exporter.protocol,
        service = %telemetry.service_name,
        "exporting telemetry over OTLP"
    );

    Ok(TelemetryGuard {
        meter_provider: Some(meter_provider),
        tracer_provider: Some(tracer_provider),
    })
}
