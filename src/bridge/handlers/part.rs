//! PART: a bridged IRC user left a channel.

use super::PeerHandler;
use crate::bridge::{BridgeContext, PeerArgs, room_name_for_channel};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use tracing::info;

/// Removes the mirrored user from one room and drops their subscription.
pub struct PartHandler;

#[async_trait]
impl PeerHandler for PartHandler {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult {
        let channel = args.require_channel()?;
        let user = ctx.user_for_nick(&args.nick).await?;

        let room = ctx
            .db
            .rooms()
            .find_by_name(room_name_for_channel(channel))
            .await?
            .ok_or_else(|| HandlerError::UnknownRoom(channel.to_string()))?;

        let removed = ctx.db.rooms().remove_username(&room.id, &user.username).await?;
        ctx.db.subscriptions().remove(&user.id, &room.id).await?;

        info!(nick = %args.nick, channel = %channel, removed, "IRC user parted");
        Ok(())
    }
}
