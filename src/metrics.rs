//! Prometheus metrics collection.
//!
//! Metrics live behind `OnceLock`s so recording is a no-op until [`init`]
//! has run; library users and unit tests need not set anything up.
//!
//! - `irc_command_total{command}` - Commands processed by type
//! - `irc_command_duration_seconds{command}` - Command latency histogram
//! - `irc_command_errors_total{command,error}` - Refusals and failures
//! - `irc_knocks_delivered_total` - Accepted KNOCK requests
//! - `irc_knock_notices_total` - Operator notices queued for accepted knocks
//! - `irc_knock_relays_total` - KNOCKs relayed to peer links
//! - `irc_messages_dropped_total{reason}` - Deliveries dropped on full/closed queues

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Commands processed by type.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command processing latency by command type.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Command errors by type and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Accepted KNOCK requests (local and remote).
pub static KNOCKS_DELIVERED: OnceLock<IntCounter> = OnceLock::new();

/// Operator notices queued for accepted knocks.
pub static KNOCK_NOTICES: OnceLock<IntCounter> = OnceLock::new();

/// KNOCK relays queued to peer links.
pub static KNOCK_RELAYS: OnceLock<IntCounter> = OnceLock::new();

/// Messages dropped due to SendQ/backpressure or closed queues.
pub static MESSAGES_DROPPED: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before metrics are recorded. Later calls
/// leave the first set of collectors in place.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if $metric.set(m.clone()).is_ok()
                        && let Err(e) = r.register(Box::new(m))
                    {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("irc_command_total", "IRC commands processed by type"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("irc_command_duration_seconds", "IRC command latency by type")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("irc_command_errors_total", "IRC command errors by type"), &["command", "error"]));
    register!(KNOCKS_DELIVERED, IntCounter::new("irc_knocks_delivered_total", "Accepted KNOCK requests"));
    register!(KNOCK_NOTICES, IntCounter::new("irc_knock_notices_total", "Operator notices queued for accepted knocks"));
    register!(KNOCK_RELAYS, IntCounter::new("irc_knock_relays_total", "KNOCKs relayed to peer servers"));
    register!(MESSAGES_DROPPED, IntCounterVec::new(Opts::new("irc_messages_dropped_total", "Messages dropped on full or closed queues"), &["reason"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record an accepted knock and its fan-out.
#[inline]
pub fn record_knock(notices: usize, relays: usize) {
    if let Some(c) = KNOCKS_DELIVERED.get() {
        c.inc();
    }
    if let Some(c) = KNOCK_NOTICES.get() {
        c.inc_by(notices as u64);
    }
    if let Some(c) = KNOCK_RELAYS.get() {
        c.inc_by(relays as u64);
    }
}

/// Record a message dropped before reaching its queue.
#[inline]
pub fn record_dropped(reason: &str) {
    if let Some(c) = MESSAGES_DROPPED.get() {
        c.with_label_values(&[reason]).inc();
    }
}
