//! Direct-message room type (`d`).
//!
//! A direct room has no name of its own: each participant sees it under the
//! other participant's username (or real name) taken from their subscription.

use super::{
    NotificationDetails, RoomSetting, RoomTypeConfig, RoomTypeEnv, RoomTypeError, RoomTypeRoute,
    RouteAction, RouteConfig, RouteParams, Side, UiTextContext, is_truthy,
};
use crate::db::{Room, Subscription, User, UserStatus};
use async_trait::async_trait;
use tracing::debug;

const USE_REAL_NAME: &str = "UI_Use_Real_Name";
const E2E_ENABLE: &str = "E2E_Enable";
const VIEW_DIRECT_ROOM: &str = "view-d-room";
const VIEW_JOINED_ROOM: &str = "view-joined-room";

/// Route `/direct/:username`.
#[derive(Debug)]
pub struct DirectMessageRoomRoute {
    config: RouteConfig,
}

impl DirectMessageRoomRoute {
    pub fn new() -> Self {
        Self {
            config: RouteConfig {
                name: "direct",
                path: "/direct/:username",
            },
        }
    }
}

impl Default for DirectMessageRoomRoute {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomTypeRoute for DirectMessageRoomRoute {
    fn config(&self) -> &RouteConfig {
        &self.config
    }

    fn action(&self, params: &RouteParams) -> Option<RouteAction> {
        let username = params.get("username")?;
        Some(RouteAction::OpenRoom {
            room_type: DirectMessageRoomType::IDENTIFIER,
            name: username.clone(),
        })
    }

    fn link(&self, sub: &Subscription) -> RouteParams {
        RouteParams::from([("username".to_string(), sub.name.clone())])
    }
}

/// The direct-message room type.
pub struct DirectMessageRoomType {
    env: RoomTypeEnv,
    route: DirectMessageRoomRoute,
}

impl DirectMessageRoomType {
    pub const IDENTIFIER: &'static str = "d";

    pub fn new(env: RoomTypeEnv) -> Self {
        Self {
            env,
            route: DirectMessageRoomRoute::new(),
        }
    }

    /// The viewer's subscription to a room.
    async fn viewer_subscription(
        &self,
        room_id: &str,
    ) -> Result<Option<Subscription>, RoomTypeError> {
        let Some(viewer) = self.env.viewer() else {
            return Ok(None);
        };
        Ok(self.env.db.subscriptions().find_by_room(viewer, room_id).await?)
    }
}

#[async_trait]
impl RoomTypeConfig for DirectMessageRoomType {
    fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn order(&self) -> u32 {
        50
    }

    fn label(&self) -> &'static str {
        "Direct_Messages"
    }

    fn route(&self) -> Option<&dyn RoomTypeRoute> {
        Some(&self.route)
    }

    async fn find_room(&self, identifier: &str) -> Result<Option<Room>, RoomTypeError> {
        if !self.env.has_permission(VIEW_DIRECT_ROOM).await? {
            debug!(identifier = %identifier, "Direct room lookup denied");
            return Ok(None);
        }

        let Some(viewer) = self.env.viewer() else {
            return Ok(None);
        };

        let subscription = self
            .env
            .db
            .subscriptions()
            .find_by_type_and_name(viewer, Self::IDENTIFIER, identifier)
            .await?;

        match subscription {
            Some(sub) if !sub.rid.is_empty() => Ok(self.env.db.rooms().find_by_id(&sub.rid).await?),
            _ => Ok(None),
        }
    }

    async fn room_name(&self, room: &Room) -> Result<String, RoomTypeError> {
        let Some(sub) = self.viewer_subscription(&room.id).await? else {
            return Ok(String::new());
        };

        if self.env.settings.is_truthy(USE_REAL_NAME)
            && let Some(fname) = sub.fname.filter(|f| !f.is_empty())
        {
            return Ok(fname);
        }

        Ok(sub.name)
    }

    async fn secondary_room_name(&self, room: &Room) -> Result<Option<String>, RoomTypeError> {
        if !self.env.settings.is_truthy(USE_REAL_NAME) {
            return Ok(None);
        }
        Ok(self.viewer_subscription(&room.id).await?.map(|sub| sub.name))
    }

    async fn condition(&self) -> Result<bool, RoomTypeError> {
        let group_by_type = self
            .env
            .user_preference("sidebarGroupByType")
            .await?
            .is_some_and(|v| is_truthy(&v));

        if !group_by_type {
            return Ok(false);
        }

        self.env
            .has_at_least_one_permission(&[VIEW_DIRECT_ROOM, VIEW_JOINED_ROOM])
            .await
    }

    async fn get_user_status(&self, room_id: &str) -> Result<Option<UserStatus>, RoomTypeError> {
        let Some(sub) = self.viewer_subscription(room_id).await? else {
            return Ok(None);
        };
        Ok(self.env.presence.get(&sub.name))
    }

    fn get_display_name(&self, room: &Room) -> String {
        room.usernames.join(" x ")
    }

    fn allow_room_setting_change(&self, _room: &Room, setting: RoomSetting) -> bool {
        match setting {
            RoomSetting::Name
            | RoomSetting::SystemMessages
            | RoomSetting::Description
            | RoomSetting::ReadOnly
            | RoomSetting::ReactWhenReadOnly
            | RoomSetting::ArchiveOrUnarchive
            | RoomSetting::JoinCode => false,
            RoomSetting::E2e => self.env.settings.get_bool(E2E_ENABLE),
            RoomSetting::Topic | RoomSetting::Announcement | RoomSetting::Broadcast => true,
        }
    }

    fn enable_members_list_profile(&self) -> bool {
        true
    }

    fn user_detail_show_all(&self, _room: &Room) -> bool {
        false
    }

    fn get_ui_text(&self, context: UiTextContext) -> &'static str {
        match context {
            UiTextContext::HideWarning => "Hide_Private_Warning",
            UiTextContext::LeaveWarning => "Leave_Private_Warning",
            _ => "",
        }
    }

    fn get_notification_details(
        &self,
        _room: &Room,
        user: &User,
        message: &str,
    ) -> Option<NotificationDetails> {
        if self.env.side != Side::Server {
            return None;
        }

        let title = if self.env.settings.is_truthy(USE_REAL_NAME) {
            user.name.clone().unwrap_or_default()
        } else {
            format!("@{}", user.username)
        };

        Some(NotificationDetails {
            title,
            text: message.to_string(),
        })
    }
}
