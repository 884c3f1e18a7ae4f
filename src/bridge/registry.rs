//! Peer event dispatch.

use super::handlers::{
    JoinHandler, NickHandler, PartHandler, PeerHandler, QuitHandler, RegisterHandler,
};
use super::{BridgeContext, PeerEvent};
use crate::error::{HandlerError, HandlerResult};
use crate::telemetry::{EventTimer, spans};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug};

/// Maps peer event commands to their handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn PeerHandler>>,
    command_counts: HashMap<&'static str, AtomicU64>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn PeerHandler>> = HashMap::new();

        handlers.insert("QUIT", Box::new(QuitHandler));
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("REGISTER", Box::new(RegisterHandler));

        let command_counts = handlers
            .keys()
            .map(|&cmd| (cmd, AtomicU64::new(0)))
            .collect();

        Self {
            handlers,
            command_counts,
        }
    }

    /// Per-command usage counts, most used first. Unused commands are omitted.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Dispatch an event to the handler for its command.
    pub async fn dispatch(&self, ctx: &BridgeContext, event: &PeerEvent) -> HandlerResult {
        let cmd_name = event.command.to_ascii_uppercase();

        let Some((&cmd, handler)) = self.handlers.get_key_value(cmd_name.as_str()) else {
            crate::metrics::record_peer_event_error(&cmd_name, "unknown_command");
            return Err(HandlerError::UnknownCommand(cmd_name));
        };

        if let Some(counter) = self.command_counts.get(cmd) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let span = spans::peer_event(cmd, &event.args.nick, event.args.channel.as_deref());
        let _timer = EventTimer::new(cmd);

        let result = handler.handle(ctx, &event.args).instrument(span).await;

        if let Err(ref e) = result {
            crate::metrics::record_peer_event_error(cmd, e.error_code());
            debug!(command = %cmd, error = %e, "Peer event error");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::PeerArgs;
    use crate::bridge::handlers::test_support::{ctx, irc_user};

    #[tokio::test]
    async fn test_dispatch_is_case_insensitive_and_counted() {
        let ctx = ctx().await;
        irc_user(&ctx, "alice").await;
        let registry = Registry::new();

        registry
            .dispatch(&ctx, &PeerEvent::new("quit", PeerArgs::nick("alice")))
            .await
            .unwrap();
        registry
            .dispatch(&ctx, &PeerEvent::new("QUIT", PeerArgs::nick("alice")))
            .await
            .unwrap();
        registry
            .dispatch(&ctx, &PeerEvent::new("REGISTER", PeerArgs::nick("bob")))
            .await
            .unwrap();

        assert_eq!(registry.get_command_stats(), vec![("QUIT", 2), ("REGISTER", 1)]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let ctx = ctx().await;
        let registry = Registry::new();

        let result = registry
            .dispatch(&ctx, &PeerEvent::new("PRIVMSG", PeerArgs::nick("alice")))
            .await;
        assert!(matches!(result, Err(HandlerError::UnknownCommand(ref c)) if c == "PRIVMSG"));
        assert!(registry.get_command_stats().is_empty());
    }

    #[tokio::test]
    async fn test_failed_dispatch_still_counts() {
        let ctx = ctx().await;
        let registry = Registry::new();

        let result = registry
            .dispatch(&ctx, &PeerEvent::new("QUIT", PeerArgs::nick("ghost")))
            .await;
        assert!(matches!(result, Err(HandlerError::UnknownNick(_))));
        assert_eq!(registry.get_command_stats(), vec![("QUIT", 1)]);
    }
}
