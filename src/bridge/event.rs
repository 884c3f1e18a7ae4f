//! Peer events decoded from the upstream IRC session.

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};

/// One event reported by the IRC peer, e.g.
/// `{"command":"QUIT","args":{"nick":"alice","reason":"bye"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEvent {
    pub command: String,
    pub args: PeerArgs,
}

/// Arguments of a peer event. Every event names the IRC nick it concerns;
/// the remaining fields depend on the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerArgs {
    pub nick: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,
}

impl PeerEvent {
    pub fn new(command: impl Into<String>, args: PeerArgs) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Decode one newline-delimited JSON event.
    pub fn parse_line(line: &str) -> Result<Self, HandlerError> {
        let event: PeerEvent =
            serde_json::from_str(line).map_err(|e| HandlerError::Malformed(e.to_string()))?;
        if event.args.nick.is_empty() {
            return Err(HandlerError::NeedMoreParams("nick"));
        }
        Ok(event)
    }
}

impl PeerArgs {
    pub fn nick(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_new_nick(mut self, new_nick: impl Into<String>) -> Self {
        self.new_nick = Some(new_nick.into());
        self
    }

    /// The channel argument, required.
    pub fn require_channel(&self) -> Result<&str, HandlerError> {
        self.channel
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(HandlerError::NeedMoreParams("channel"))
    }

    /// The new nick argument, required.
    pub fn require_new_nick(&self) -> Result<&str, HandlerError> {
        self.new_nick
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(HandlerError::NeedMoreParams("new_nick"))
    }
}

/// Room name for an IRC channel: the channel without its `#` or `&` sigil.
pub fn room_name_for_channel(channel: &str) -> &str {
    channel
        .strip_prefix('#')
        .or_else(|| channel.strip_prefix('&'))
        .unwrap_or(channel)
}
