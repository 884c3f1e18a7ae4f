//! IRC peer bridge.
//!
//! Mirrors events from an IRC peer network onto the local chat store.
//! Events arrive already decoded (one JSON object per line); each is
//! routed by command to a [`PeerHandler`] through the [`Registry`].

mod context;
mod event;
pub mod handlers;
mod registry;

pub use context::BridgeContext;
pub use event::{PeerArgs, PeerEvent, room_name_for_channel};
pub use handlers::PeerHandler;
pub use registry::Registry;

use crate::error::HandlerResult;
use crate::telemetry::spans;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{Instrument, info, warn};

/// Totals from one run of the input loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub handled: u64,
    pub failed: u64,
}

/// A bridge: handler registry plus the state handlers act on.
pub struct Bridge {
    name: String,
    ctx: BridgeContext,
    registry: Registry,
}

impl Bridge {
    pub fn new(name: impl Into<String>, ctx: BridgeContext) -> Self {
        Self {
            name: name.into(),
            ctx,
            registry: Registry::new(),
        }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.ctx
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode and handle one input line.
    pub async fn process_line(&self, line: &str) -> HandlerResult {
        let event = PeerEvent::parse_line(line)?;
        self.registry.dispatch(&self.ctx, &event).await
    }

    /// Handle newline-delimited events until the reader is exhausted.
    ///
    /// Per-event failures are logged and counted; only I/O errors end the loop.
    pub async fn run<R>(&self, reader: R) -> std::io::Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let span = spans::bridge(&self.name);
        async {
            let mut stats = RunStats::default();
            let mut lines = reader.lines();

            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match self.process_line(line).await {
                    Ok(()) => stats.handled += 1,
                    Err(e) => {
                        stats.failed += 1;
                        warn!(error = %e, code = e.error_code(), "Failed to handle peer event");
                    }
                }
            }

            info!(handled = stats.handled, failed = stats.failed, "Peer input closed");
            Ok::<_, std::io::Error>(stats)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::handlers::test_support::{channel, ctx};
    use super::*;
    use crate::db::UserStatus;

    #[tokio::test]
    async fn test_run_processes_stream() {
        let ctx = ctx().await;
        let room = channel(&ctx, "general", &[]).await;
        let bridge = Bridge::new("test", ctx);

        let input = concat!(
            r#"{"command":"REGISTER","args":{"nick":"alice"}}"#, "\n",
            r##"{"command":"JOIN","args":{"nick":"alice","channel":"#general"}}"##, "\n",
            "\n",
            "garbage\n",
            r#"{"command":"QUIT","args":{"nick":"alice"}}"#, "\n",
        );

        let stats = bridge.run(input.as_bytes()).await.unwrap();
        assert_eq!(stats, RunStats { handled: 3, failed: 1 });

        let db = &bridge.context().db;
        assert!(db.rooms().usernames(&room.id).await.unwrap().is_empty());
        let alice = db.users().find_by_irc_nick("alice").await.unwrap().unwrap();
        assert_eq!(alice.status, UserStatus::Offline);
    }
}
