//! Prometheus metrics collection for roombridge.
//!
//! - `bridge_peer_events_total{command}` - Peer events processed by command
//! - `bridge_peer_event_duration_seconds{command}` - Handler latency histogram
//! - `bridge_peer_event_errors_total{command,error}` - Handler errors by code
//! - `bridge_users_marked_offline_total` - Users set offline by QUIT

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Peer events processed by command (QUIT, NICK, JOIN, ...).
pub static PEER_EVENT_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Peer event handler latency by command.
pub static PEER_EVENT_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Peer event errors by command and error code.
pub static PEER_EVENT_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Users set offline after a remote disconnect.
pub static USERS_MARKED_OFFLINE: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded.
/// Recording before `init` is a silent no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(PEER_EVENT_COUNTER, IntCounterVec::new(Opts::new("bridge_peer_events_total", "Peer events processed by command"), &["command"]));
    register!(PEER_EVENT_LATENCY, HistogramVec::new(
        HistogramOpts::new("bridge_peer_event_duration_seconds", "Peer event handler latency by command")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["command"]));
    register!(PEER_EVENT_ERRORS, IntCounterVec::new(Opts::new("bridge_peer_event_errors_total", "Peer event errors by command"), &["command", "error"]));
    register!(USERS_MARKED_OFFLINE, IntCounter::new("bridge_users_marked_offline_total", "Users set offline by remote disconnects"));
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
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a handled peer event with latency.
#[inline]
pub fn record_peer_event(command: &str, duration_secs: f64) {
    if let Some(c) = PEER_EVENT_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = PEER_EVENT_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a peer event error.
#[inline]
pub fn record_peer_event_error(command: &str, error: &str) {
    if let Some(c) = PEER_EVENT_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_user_offline() {
    if let Some(c) = USERS_MARKED_OFFLINE.get() {
        c.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();

        record_peer_event("QUIT", 0.001);
        record_peer_event_error("QUIT", "unknown_nick");

        let output = gather_metrics();
        assert!(output.contains("bridge_peer_events_total"));
        assert!(output.contains("bridge_peer_event_errors_total"));
    }
}
