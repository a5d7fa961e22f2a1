//! OTLP providers for traces and metrics

use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use tollgate_config::{ExportProtocol, ExporterConfig, TracingConfig};

pub fn meter_provider(exporter: &ExporterConfig, resource: Resource) -> anyhow::Result<SdkMeterProvider> {
    let endpoint = exporter.endpoint.as_str();
    let metric_exporter = match exporter.protocol {
        ExportProtocol::Grpc => MetricExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => MetricExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build metrics exporter for {endpoint}: {e}"))?;

    let reader = PeriodicReader::builder(metric_exporter)
        .with_interval(exporter.metrics_interval()?)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

pub fn tracer_provider(
    exporter: &ExporterConfig,
    tracing: &TracingConfig,
    resource: Resource,
) -> anyhow::Result<SdkTracerProvider> {
    let endpoint = exporter.endpoint.as_str();
    let span_exporter = match exporter.protocol {
        ExportProtocol::Grpc => SpanExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => SpanExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build span exporter for {endpoint}: {e}"))?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(sampler(tracing))
        .with_batch_exporter(span_exporter)
        .build())
}

fn sampler(config: &TracingConfig) -> Sampler {
    let root = match config.sampling_rate {
        rate if rate >= 1.0 => Sampler::AlwaysOn,
        rate if rate <= 0.0 => Sampler::AlwaysOff,
        rate => Sampler::TraceIdRatioBased(rate),
    };

    if config.parent_based {
        Sampler::ParentBased(Box::new(root))
    } else {
        root
    }
}
