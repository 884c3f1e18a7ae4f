//! QUIT: a bridged IRC user disconnected.

use super::PeerHandler;
use crate::bridge::{BridgeContext, PeerArgs};
use crate::db::UserStatus;
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

/// Marks the mirrored user offline and scrubs their username from every
/// room's membership cache.
///
/// The steps run in sequence without a transaction; a failure part way
/// leaves the earlier steps applied.
pub struct QuitHandler;

#[async_trait]
impl PeerHandler for QuitHandler {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult {
        let user = ctx.user_for_nick(&args.nick).await?;

        ctx.db.users().set_status(&user.id, UserStatus::Offline).await?;
        ctx.presence.set(&user.username, UserStatus::Offline);
        crate::metrics::record_user_offline();

        let rooms = ctx.db.rooms().remove_username_from_all(&user.username).await?;

        info!(
            nick = %args.nick,
            username = %user.username,
            reason = ?args.reason,
            rooms,
            "IRC user quit"
        );

        Ok(())
    }
}
