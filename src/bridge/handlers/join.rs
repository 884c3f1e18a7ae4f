//! JOIN: a bridged IRC user joined a channel.

use super::PeerHandler;
use crate::bridge::{BridgeContext, PeerArgs, room_name_for_channel};
use crate::db::UserStatus;
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use tracing::{debug, info};

/// Adds the mirrored user to the channel's room, subscribing them if they
/// are not yet, and marks them online.
pub struct JoinHandler;

#[async_trait]
impl PeerHandler for JoinHandler {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult {
        let channel = args.require_channel()?;
        let user = ctx.user_for_nick(&args.nick).await?;

        let room_name = room_name_for_channel(channel);
        let room = ctx
            .db
            .rooms()
            .find_by_name(room_name)
            .await?
            .ok_or_else(|| HandlerError::UnknownRoom(channel.to_string()))?;

        let added = ctx.db.rooms().add_username(&room.id, &user.username).await?;

        let subscriptions = ctx.db.subscriptions();
        if subscriptions.find_by_room(&user.id, &room.id).await?.is_none() {
            subscriptions
                .create(&room.id, &user.id, &room.t, room_name, room.fname.as_deref())
                .await?;
            debug!(username = %user.username, room = %room_name, "Subscription created");
        }

        ctx.db.users().set_status(&user.id, UserStatus::Online).await?;
        ctx.presence.set(&user.username, UserStatus::Online);

        info!(nick = %args.nick, channel = %channel, added, "IRC user joined");
        Ok(())
    }
}
