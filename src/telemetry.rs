//! Telemetry utilities for peer event timing and tracing spans.

use std::time::Instant;

/// Guard for timing peer event handling and recording metrics.
///
/// Records handler latency when dropped.
pub struct EventTimer {
    command: String,
    start: Instant,
}

impl EventTimer {
    /// Start timing a peer event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for EventTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_peer_event(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span covering the lifetime of the bridge input loop.
    pub fn bridge(name: &str) -> Span {
        info_span!("bridge", name = %name)
    }

    /// Span for one peer event.
    pub fn peer_event(command: &str, nick: &str, channel: Option<&str>) -> Span {
        if let Some(channel) = channel {
            debug_span!("peer.event", command = %command, nick = %nick, channel = %channel)
        } else {
            debug_span!("peer.event", command = %command, nick = %nick)
        }
    }
}
