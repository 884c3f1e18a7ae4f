//! Room types.
//!
//! A room type is a strategy object describing how one category of room
//! behaves: how it is routed to, named, gated by permissions and described
//! in notifications. Each implementation is built over a [`RoomTypeEnv`]
//! that supplies the collaborators it consults.
//!
//! - [`config`]: the [`RoomTypeConfig`] trait and its enumerations
//! - [`direct`]: the direct-message room type (`d`)
//! - [`route`]: route descriptors for room types
//! - [`settings`], [`presence`], [`permissions`]: collaborators

pub mod config;
pub mod direct;
pub mod permissions;
pub mod presence;
pub mod route;
pub mod settings;

pub use config::{NotificationDetails, RoomSetting, RoomTypeConfig, UiTextContext};
pub use direct::{DirectMessageRoomRoute, DirectMessageRoomType};
pub use permissions::{PermissionChecker, RolePermissions};
pub use presence::PresenceCache;
pub use route::{RoomTypeRoute, RouteAction, RouteConfig, RouteParams};
pub use settings::SettingsStore;

use crate::db::{Database, DbError};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while answering room-type queries.
#[derive(Debug, Error)]
pub enum RoomTypeError {
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Where room-type logic is being evaluated.
///
/// Some answers (notification details) only exist on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Server,
    Client,
}

/// Collaborators shared by room-type implementations, scoped to one viewer.
#[derive(Clone)]
pub struct RoomTypeEnv {
    pub db: Database,
    pub settings: Arc<SettingsStore>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub presence: Arc<PresenceCache>,
    pub side: Side,
    /// The user on whose behalf queries are answered, if any.
    pub viewer: Option<String>,
}

impl RoomTypeEnv {
    /// Prefix of the settings that hold default user preferences.
    const DEFAULT_PREFERENCE_PREFIX: &'static str = "Accounts_Default_User_Preferences_";

    /// The same environment answering for another viewer.
    pub fn for_viewer(&self, user_id: impl Into<String>) -> Self {
        Self {
            viewer: Some(user_id.into()),
            ..self.clone()
        }
    }

    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    /// A preference of the viewer, falling back to the configured default.
    pub async fn user_preference(
        &self,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RoomTypeError> {
        if let Some(user_id) = self.viewer()
            && let Some(value) = self.db.users().preference(user_id, key).await?
        {
            return Ok(Some(value));
        }

        let default_key = format!("{}{}", Self::DEFAULT_PREFERENCE_PREFIX, key);
        Ok(self.settings.get(&default_key).map(|v| serde_json::Value::from(&v)))
    }

    pub async fn has_permission(&self, permission: &str) -> Result<bool, RoomTypeError> {
        self.permissions.has_permission(self.viewer(), permission).await
    }

    pub async fn has_at_least_one_permission(
        &self,
        permissions: &[&str],
    ) -> Result<bool, RoomTypeError> {
        self.permissions
            .has_at_least_one_permission(self.viewer(), permissions)
            .await
    }
}

/// JavaScript-style truthiness of a preference value.
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_preference_falls_back_to_default_setting() {
        let env = test_support::env().await;
        let alice = env.db.users().create("alice", None, None).await.unwrap();
        let env = env.for_viewer(&alice.id);

        assert_eq!(env.user_preference("sidebarGroupByType").await.unwrap(), None);

        test_support::set(
            &env,
            "Accounts_Default_User_Preferences_sidebarGroupByType",
            true,
        );
        assert_eq!(
            env.user_preference("sidebarGroupByType").await.unwrap(),
            Some(json!(true))
        );

        env.db
            .users()
            .set_preference(&alice.id, "sidebarGroupByType", &json!(false))
            .await
            .unwrap();
        assert_eq!(
            env.user_preference("sidebarGroupByType").await.unwrap(),
            Some(json!(false))
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(1.5)));
    }
}
