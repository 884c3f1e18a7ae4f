//! Subscription repository.
//!
//! A subscription links one user to one room and carries the name under
//! which that user sees the room.

use super::{DbError, new_id};
use sqlx::SqlitePool;

/// A user's subscription to a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: String,
    /// Room id.
    pub rid: String,
    pub user_id: String,
    /// Room type identifier, mirrored from the room.
    pub t: String,
    /// Room name as seen by this user (the other participant's username for DMs).
    pub name: String,
    /// Display name as seen by this user (the other participant's real name for DMs).
    pub fname: Option<String>,
    pub open: bool,
}

type SubscriptionRow = (String, String, String, String, String, Option<String>, bool);

impl From<SubscriptionRow> for Subscription {
    fn from((id, rid, user_id, t, name, fname, open): SubscriptionRow) -> Self {
        Self {
            id,
            rid,
            user_id,
            t,
            name,
            fname,
            open,
        }
    }
}

/// Repository for subscription operations.
pub struct SubscriptionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new subscription repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe a user to a room.
    pub async fn create(
        &self,
        rid: &str,
        user_id: &str,
        t: &str,
        name: &str,
        fname: Option<&str>,
    ) -> Result<Subscription, DbError> {
        let sub = Subscription {
            id: new_id(),
            rid: rid.to_string(),
            user_id: user_id.to_string(),
            t: t.to_string(),
            name: name.to_string(),
            fname: fname.map(String::from),
            open: true,
        };

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, rid, user_id, t, name, fname, open)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sub.id)
        .bind(&sub.rid)
        .bind(&sub.user_id)
        .bind(&sub.t)
        .bind(&sub.name)
        .bind(&sub.fname)
        .bind(sub.open)
        .execute(self.pool)
        .await?;

        Ok(sub)
    }

    /// Find a user's subscription by room type and name.
    pub async fn find_by_type_and_name(
        &self,
        user_id: &str,
        t: &str,
        name: &str,
    ) -> Result<Option<Subscription>, DbError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, rid, user_id, t, name, fname, open FROM subscriptions
            WHERE user_id = ? AND t = ? AND name = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(t)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Subscription::from))
    }

    /// Find a user's subscription to a room.
    pub async fn find_by_room(
        &self,
        user_id: &str,
        rid: &str,
    ) -> Result<Option<Subscription>, DbError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, rid, user_id, t, name, fname, open FROM subscriptions
            WHERE user_id = ? AND rid = ?
            "#,
        )
        .bind(user_id)
        .bind(rid)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Subscription::from))
    }

    /// Drop a user's subscription to a room.
    pub async fn remove(&self, user_id: &str, rid: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND rid = ?")
            .bind(user_id)
            .bind(rid)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;

    #[tokio::test]
    async fn test_lookup_is_scoped_to_user() {
        let db = Database::new(":memory:").await.unwrap();
        let alice = db.users().create("alice", None, None).await.unwrap();
        let bob = db.users().create("bob", None, None).await.unwrap();
        let room = db.rooms().create("c", Some("general"), None).await.unwrap();

        db.subscriptions()
            .create(&room.id, &alice.id, "c", "general", None)
            .await
            .unwrap();

        let subs = db.subscriptions();
        assert!(
            subs.find_by_type_and_name(&alice.id, "c", "general")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            subs.find_by_type_and_name(&bob.id, "c", "general")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            subs.find_by_type_and_name(&alice.id, "d", "general")
                .await
                .unwrap()
                .is_none()
        );
        assert!(subs.find_by_room(&bob.id, &room.id).await.unwrap().is_none());

        assert!(subs.remove(&alice.id, &room.id).await.unwrap());
        assert!(!subs.remove(&alice.id, &room.id).await.unwrap());
        assert!(subs.find_by_room(&alice.id, &room.id).await.unwrap().is_none());
    }
}
