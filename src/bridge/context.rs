//! State shared by peer handlers.

use crate::db::{Database, User};
use crate::error::HandlerError;
use crate::rooms::PresenceCache;
use std::sync::Arc;

/// What a peer handler can touch: the chat store and the presence cache.
#[derive(Clone)]
pub struct BridgeContext {
    pub db: Database,
    pub presence: Arc<PresenceCache>,
}

impl BridgeContext {
    pub fn new(db: Database, presence: Arc<PresenceCache>) -> Self {
        Self { db, presence }
    }

    /// The local user mirrored from an IRC nick.
    pub async fn user_for_nick(&self, nick: &str) -> Result<User, HandlerError> {
        self.db
            .users()
            .find_by_irc_nick(nick)
            .await?
            .ok_or_else(|| HandlerError::UnknownNick(nick.to_string()))
    }
}
