use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::metrics::{
    CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, CONTENT_SERVED_TOTAL, CONTENT_TOTAL, ERRORS_TOTAL,
    REQUESTS_TOTAL, UPTIME_SECONDS,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register metric descriptions with the installed recorder. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            REQUESTS_TOTAL,
            Unit::Count,
            "Total number of HTTP requests received."
        );
        describe_counter!(
            CONTENT_SERVED_TOTAL,
            Unit::Count,
            "Total number of content items returned to callers."
        );
        describe_counter!(
            CACHE_HITS_TOTAL,
            Unit::Count,
            "Total number of cache lookups answered from the cache."
        );
        describe_counter!(
            CACHE_MISSES_TOTAL,
            Unit::Count,
            "Total number of cache lookups that fell through to the catalog."
        );
        describe_counter!(
            ERRORS_TOTAL,
            Unit::Count,
            "Total number of requests that ended in a server error."
        );
        describe_gauge!(
            UPTIME_SECONDS,
            Unit::Seconds,
            "Seconds since the service started."
        );
        describe_gauge!(
            CONTENT_TOTAL,
            Unit::Count,
            "Number of content items in the catalog."
        );
    });
}
