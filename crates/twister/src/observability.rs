//! OpenTelemetry bridge for Twister's tracing spans.
//!
//! Spans are exported to stdout, so pair this with `--output` when the
//! generated tree should not share stdout with telemetry. Logs go to stderr.

use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use opentelemetry_stdout::SpanExporter;
use tracing::warn;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Service name reported on every span.
pub const SERVICE_NAME: &str = "twister";

/// Resource metadata and log format for the telemetry pipeline.
///
/// # Examples
///
/// ```
/// use twister::observability::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new()
///     .with_attribute("twister.completion.model", "gpt-3.5-turbo-1106")
///     .with_json_logs(true);
///
/// assert_eq!(config.service_name(), "twister");
/// assert!(config
///     .resource_attributes()
///     .iter()
///     .any(|(key, value)| key == "twister.completion.model" && value == "gpt-3.5-turbo-1106"));
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    service_name: String,
    service_version: String,
    json_logs: bool,
    attributes: Vec<(String, String)>,
}

impl ObservabilityConfig {
    /// Twister's own service name and crate version.
    pub fn new() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            json_logs: false,
            attributes: Vec::new(),
        }
    }

    /// Emit logs as JSON lines.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Attach an extra resource attribute, e.g. the completion model.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// The reported service name.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Every resource attribute besides the service name, version first.
    pub fn resource_attributes(&self) -> Vec<(String, String)> {
        let mut attributes = vec![(
            "service.version".to_string(),
            self.service_version.clone(),
        )];
        attributes.extend(self.attributes.iter().cloned());
        attributes
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Flushes and shuts down the tracer provider when dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.provider.shutdown() {
            warn!(error = %e, "Tracer provider did not shut down cleanly");
        }
    }
}

/// Install the global subscriber with an OpenTelemetry layer.
///
/// `filter` is applied to both the log output and the exported spans. Keep the
/// returned guard alive for the life of the process.
pub fn init_observability(
    config: ObservabilityConfig,
    filter: EnvFilter,
) -> Result<TelemetryGuard, Box<dyn std::error::Error>> {
    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes(
            config
                .resource_attributes()
                .into_iter()
                .map(|(key, value)| KeyValue::new(key, value)),
        )
        .build();

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_resource(resource)
        .build();
    global::set_tracer_provider(provider.clone());

    let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME));

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(TelemetryGuard { provider })
}
