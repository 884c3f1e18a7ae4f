//! NICK: a bridged IRC user changed nickname.

use super::PeerHandler;
use crate::bridge::{BridgeContext, PeerArgs};
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

/// Rebinds the mirrored user to the new IRC nickname. The local username
/// is left alone.
pub struct NickHandler;

#[async_trait]
impl PeerHandler for NickHandler {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult {
        let new_nick = args.require_new_nick()?;
        let user = ctx.user_for_nick(&args.nick).await?;

        ctx.db.users().set_irc_nick(&user.id, new_nick).await?;

        info!(old = %args.nick, new = %new_nick, username = %user.username, "IRC nick changed");
        Ok(())
    }
}
