//! The room-type strategy trait.

use super::{RoomTypeError, RoomTypeRoute};
use crate::db::{Room, User, UserStatus};
use async_trait::async_trait;

/// Room settings whose editability depends on the room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomSetting {
    Name,
    Topic,
    Announcement,
    Description,
    ReadOnly,
    ReactWhenReadOnly,
    ArchiveOrUnarchive,
    JoinCode,
    Broadcast,
    SystemMessages,
    E2e,
}

/// UI places whose wording depends on the room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiTextContext {
    CloseWarning,
    HideWarning,
    LeaveWarning,
    NoRoomsSubscribed,
}

/// Title and body of a notification about a message in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDetails {
    pub title: String,
    pub text: String,
}

/// Behaviour of one category of room.
///
/// Defaults describe a plain named room; implementations override what
/// differs for their category.
#[async_trait]
pub trait RoomTypeConfig: Send + Sync {
    /// Short type identifier stored on rooms and subscriptions (`d`, `c`, ...).
    fn identifier(&self) -> &'static str;

    /// Sort position among room types in the sidebar.
    fn order(&self) -> u32;

    /// Translation key of the sidebar section label.
    fn label(&self) -> &'static str;

    fn route(&self) -> Option<&dyn RoomTypeRoute> {
        None
    }

    /// Resolve a room of this type from its route identifier.
    async fn find_room(&self, _identifier: &str) -> Result<Option<Room>, RoomTypeError> {
        Ok(None)
    }

    /// Name shown for the room.
    async fn room_name(&self, room: &Room) -> Result<String, RoomTypeError> {
        Ok(room.name.clone().unwrap_or_default())
    }

    /// Secondary line shown under the room name.
    async fn secondary_room_name(&self, _room: &Room) -> Result<Option<String>, RoomTypeError> {
        Ok(None)
    }

    /// Whether the sidebar shows a section for this type.
    async fn condition(&self) -> Result<bool, RoomTypeError> {
        Ok(true)
    }

    /// Presence indicator for the room, if it has one.
    async fn get_user_status(&self, _room_id: &str) -> Result<Option<UserStatus>, RoomTypeError> {
        Ok(None)
    }

    fn get_display_name(&self, room: &Room) -> String {
        room.name.clone().unwrap_or_default()
    }

    fn allow_room_setting_change(&self, _room: &Room, _setting: RoomSetting) -> bool {
        true
    }

    fn enable_members_list_profile(&self) -> bool {
        false
    }

    fn user_detail_show_all(&self, _room: &Room) -> bool {
        true
    }

    /// Translation key for a UI text, or `""` when the type has none.
    fn get_ui_text(&self, _context: UiTextContext) -> &'static str {
        ""
    }

    /// Notification title and body for a message sent by `user`.
    ///
    /// `None` where notifications are not composed (client side).
    fn get_notification_details(
        &self,
        room: &Room,
        user: &User,
        message: &str,
    ) -> Option<NotificationDetails>;
}
