//! REGISTER: a new IRC user appeared on the peer network.

use super::PeerHandler;
use crate::bridge::{BridgeContext, PeerArgs};
use crate::db::UserStatus;
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::{debug, info};

/// Creates the local user mirroring an IRC nick, or refreshes the presence
/// of an already mirrored one.
pub struct RegisterHandler;

#[async_trait]
impl PeerHandler for RegisterHandler {
    async fn handle(&self, ctx: &BridgeContext, args: &PeerArgs) -> HandlerResult {
        let users = ctx.db.users();

        let user = match users.find_by_irc_nick(&args.nick).await? {
            Some(existing) => {
                debug!(nick = %args.nick, username = %existing.username, "IRC user already mirrored");
                existing
            }
            None => {
                let username = args.username.as_deref().unwrap_or(&args.nick);
                let created = users
                    .create(username, args.realname.as_deref(), Some(&args.nick))
                    .await?;
                info!(nick = %args.nick, username = %created.username, "Mirrored IRC user");
                created
            }
        };

        users.set_status(&user.id, UserStatus::Online).await?;
        ctx.presence.set(&user.username, UserStatus::Online);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx;
    use super::*;
    use crate::db::DbError;
    use crate::error::HandlerError;

    #[tokio::test]
    async fn test_register_creates_user_once() {
        let ctx = ctx().await;
        let args = PeerArgs {
            nick: "alice".into(),
            username: Some("alice.irc".into()),
            realname: Some("Alice".into()),
            ..PeerArgs::default()
        };

        RegisterHandler.handle(&ctx, &args).await.unwrap();
        let first = ctx.user_for_nick("alice").await.unwrap();
        assert_eq!(first.username, "alice.irc");
        assert_eq!(first.name.as_deref(), Some("Alice"));
        assert_eq!(first.status, UserStatus::Online);

        ctx.db.users().set_status(&first.id, UserStatus::Offline).await.unwrap();
        RegisterHandler.handle(&ctx, &args).await.unwrap();
        let second = ctx.user_for_nick("alice").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, UserStatus::Online);
        assert_eq!(ctx.presence.get("alice.irc"), Some(UserStatus::Online));
    }

    #[tokio::test]
    async fn test_register_defaults_username_to_nick() {
        let ctx = ctx().await;
        RegisterHandler
            .handle(&ctx, &PeerArgs::nick("bob"))
            .await
            .unwrap();
        assert_eq!(ctx.user_for_nick("bob").await.unwrap().username, "bob");
    }

    #[tokio::test]
    async fn test_register_username_collision() {
        let ctx = ctx().await;
        ctx.db.users().create("bob", None, None).await.unwrap();

        let result = RegisterHandler.handle(&ctx, &PeerArgs::nick("bob")).await;
        assert!(matches!(result, Err(HandlerError::Db(DbError::UsernameTaken(_)))));
    }
}
