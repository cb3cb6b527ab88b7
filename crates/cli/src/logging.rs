//! Subscriber setup for the selected log sink.

use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};
use trigger::LogSink;

use crate::telemetry;

/// Keeps the span exporter alive; call [`LoggingGuard::shutdown`] before exit
/// so buffered spans are flushed.
#[must_use]
pub struct LoggingGuard {
    provider: Option<TracerProvider>,
}

impl LoggingGuard {
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                eprintln!("ansihook: failed to flush spans: {e}");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(sink: LogSink, otlp_endpoint: Option<&str>) -> anyhow::Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let output: Box<dyn Layer<Registry> + Send + Sync> = match sink {
        LogSink::Stdout => fmt::layer().with_target(false).boxed(),
        LogSink::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogSink::Syslog => syslog_layer()?,
    };

    let provider = otlp_endpoint.map(telemetry::otlp_provider).transpose()?;
    let otel = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(telemetry::SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(output)
        .with(otel)
        .with(filter)
        .try_init()
        .context("failed to install the log subscriber")?;

    Ok(LoggingGuard { provider })
}

#[cfg(unix)]
fn syslog_layer() -> anyhow::Result<Box<dyn Layer<Registry> + Send + Sync>> {
    use crate::syslog::{SyslogWriter, SOCKET_PATH};

    let writer = SyslogWriter::connect(SOCKET_PATH)
        .with_context(|| format!("unable to connect to syslog at {SOCKET_PATH}"))?;
    Ok(fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .boxed())
}

#[cfg(not(unix))]
fn syslog_layer() -> anyhow::Result<Box<dyn Layer<Registry> + Send + Sync>> {
    anyhow::bail!("the syslog log sink is only available on unix")
}
