use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber writing to stderr, keeping stdout for
/// command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
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

/// Register descriptions for every counter the caches emit. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "hydra_attr_cache_hit_total",
            Unit::Count,
            "Attribute lookups answered from a fresh main entry."
        );
        describe_counter!(
            "hydra_attr_cache_reload_total",
            Unit::Count,
            "Documents read from the backing store and re-cached."
        );
        describe_counter!(
            "hydra_attr_cache_heal_total",
            Unit::Count,
            "Reloads forced by a missing or mismatched long value."
        );
        describe_counter!(
            "hydra_attr_cache_poisoned_total",
            Unit::Count,
            "Failed document reads cached as poisoned entries."
        );
        describe_counter!(
            "hydra_stat_cache_hit_total",
            Unit::Count,
            "Stat lookups answered from the cache."
        );
        describe_counter!(
            "hydra_stat_cache_miss_total",
            Unit::Count,
            "Stat lookups that reached the backing store."
        );
    });
}
