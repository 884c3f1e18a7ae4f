//! roombridge - IRC peer bridge and room types for a chat platform.
//!
//! - [`bridge`]: mirrors IRC peer events (QUIT, NICK, JOIN, PART, REGISTER)
//!   onto local users, rooms and subscriptions
//! - [`rooms`]: room-type strategies, starting with direct messages

pub mod bridge;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod rooms;
pub mod telemetry;

use crate::bridge::{Bridge, BridgeContext};
use crate::config::Config;
use crate::db::{Database, DbError};
use crate::rooms::{PresenceCache, RolePermissions, RoomTypeEnv, SettingsStore};
use std::sync::Arc;

/// Everything built from a loaded config: the bridge and the environment
/// room types are evaluated in. Both share one database and presence cache.
pub struct App {
    pub bridge: Bridge,
    pub rooms: RoomTypeEnv,
}

impl App {
    pub async fn from_config(config: &Config) -> Result<Self, DbError> {
        let db = Database::new(config.database_path()).await?;
        let presence = Arc::new(PresenceCache::new());

        let rooms = RoomTypeEnv {
            db: db.clone(),
            settings: Arc::new(SettingsStore::from_config(&config.settings)),
            permissions: Arc::new(RolePermissions::new(db.clone(), &config.permissions)),
            presence: presence.clone(),
            side: config.bridge.side,
            viewer: None,
        };

        let bridge = Bridge::new(&config.bridge.name, BridgeContext::new(db, presence));

        Ok(Self { bridge, rooms })
    }
}
