//! Room repository.
//!
//! Rooms carry a username membership cache (`room_usernames`) which the
//! bridge keeps in step with IRC channel membership.

use super::{DbError, User, new_id, now};
use sqlx::SqlitePool;

/// A chat room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: String,
    /// Room type identifier (`d` for direct messages, `c` for channels, ...).
    pub t: String,
    pub name: Option<String>,
    pub fname: Option<String>,
    /// Membership cache, in join order.
    pub usernames: Vec<String>,
    pub created_at: i64,
}

type RoomRow = (String, String, Option<String>, Option<String>, i64);

/// Repository for room operations.
pub struct RoomRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoomRepository<'a> {
    /// Create a new room repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an empty room.
    pub async fn create(
        &self,
        t: &str,
        name: Option<&str>,
        fname: Option<&str>,
    ) -> Result<Room, DbError> {
        let room = Room {
            id: new_id(),
            t: t.to_string(),
            name: name.map(String::from),
            fname: fname.map(String::from),
            usernames: Vec::new(),
            created_at: now(),
        };

        sqlx::query("INSERT INTO rooms (id, t, name, fname, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&room.id)
            .bind(&room.t)
            .bind(&room.name)
            .bind(&room.fname)
            .bind(room.created_at)
            .execute(self.pool)
            .await?;

        Ok(room)
    }

    /// Create a direct-message room between two users, with a subscription
    /// for each side named after the other participant.
    ///
    /// Uses a transaction so the room never exists without both subscriptions.
    pub async fn create_direct(&self, from: &User, to: &User) -> Result<Room, DbError> {
        let room = Room {
            id: new_id(),
            t: "d".to_string(),
            name: None,
            fname: None,
            usernames: vec![from.username.clone(), to.username.clone()],
            created_at: now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO rooms (id, t, name, fname, created_at) VALUES (?, 'd', NULL, NULL, ?)")
            .bind(&room.id)
            .bind(room.created_at)
            .execute(&mut *tx)
            .await?;

        for username in &room.usernames {
            sqlx::query("INSERT OR IGNORE INTO room_usernames (room_id, username) VALUES (?, ?)")
                .bind(&room.id)
                .bind(username)
                .execute(&mut *tx)
                .await?;
        }

        for (owner, other) in [(from, to), (to, from)] {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO subscriptions (id, rid, user_id, t, name, fname, open)
                VALUES (?, ?, ?, 'd', ?, ?, 1)
                "#,
            )
            .bind(new_id())
            .bind(&room.id)
            .bind(&owner.id)
            .bind(&other.username)
            .bind(&other.name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(room)
    }

    /// Find a room by id, including its membership cache.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Room>, DbError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, t, name, fname, created_at FROM rooms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        self.hydrate(row).await
    }

    /// Find a named (non-direct) room by name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Room>, DbError> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT id, t, name, fname, created_at FROM rooms
            WHERE name = ? AND t != 'd'
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn hydrate(&self, row: Option<RoomRow>) -> Result<Option<Room>, DbError> {
        let Some((id, t, name, fname, created_at)) = row else {
            return Ok(None);
        };
        let usernames = self.usernames(&id).await?;
        Ok(Some(Room {
            id,
            t,
            name,
            fname,
            usernames,
            created_at,
        }))
    }

    /// Usernames in a room, in join order.
    pub async fn usernames(&self, room_id: &str) -> Result<Vec<String>, DbError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT username FROM room_usernames WHERE room_id = ? ORDER BY rowid",
        )
        .bind(room_id)
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    /// Ids of every room whose membership cache lists the username.
    pub async fn room_ids_with_username(&self, username: &str) -> Result<Vec<String>, DbError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT room_id FROM room_usernames WHERE username = ? ORDER BY room_id",
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Add a username to a room's membership cache.
    ///
    /// Returns false when it was already present.
    pub async fn add_username(&self, room_id: &str, username: &str) -> Result<bool, DbError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO room_usernames (room_id, username) VALUES (?, ?)")
                .bind(room_id)
                .bind(username)
                .execute(self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                        DbError::RoomNotFound(room_id.to_string())
                    }
                    other => DbError::from(other),
                })?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a username from one room's membership cache.
    pub async fn remove_username(&self, room_id: &str, username: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM room_usernames WHERE room_id = ? AND username = ?")
            .bind(room_id)
            .bind(username)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a username from every room's membership cache.
    ///
    /// Returns the number of rooms it was removed from.
    pub async fn remove_username_from_all(&self, username: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM room_usernames WHERE username = ?")
            .bind(username)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;

    #[tokio::test]
    async fn test_membership_cache() {
        let db = Database::new(":memory:").await.unwrap();
        let rooms = db.rooms();

        let general = rooms.create("c", Some("general"), None).await.unwrap();
        let random = rooms.create("c", Some("random"), None).await.unwrap();

        assert!(rooms.add_username(&general.id, "alice").await.unwrap());
        assert!(!rooms.add_username(&general.id, "alice").await.unwrap());
        rooms.add_username(&general.id, "bob").await.unwrap();
        rooms.add_username(&random.id, "alice").await.unwrap();

        let general = rooms.find_by_name("general").await.unwrap().unwrap();
        assert_eq!(general.usernames, vec!["alice", "bob"]);

        assert_eq!(rooms.remove_username_from_all("alice").await.unwrap(), 2);
        assert_eq!(rooms.usernames(&general.id).await.unwrap(), vec!["bob"]);
        assert!(rooms.usernames(&random.id).await.unwrap().is_empty());
        assert_eq!(rooms.remove_username_from_all("alice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_username_to_missing_room() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.rooms().add_username("nope", "alice").await.is_err());
    }

    #[tokio::test]
    async fn test_create_direct() {
        let db = Database::new(":memory:").await.unwrap();
        let alice = db.users().create("alice", Some("Alice"), None).await.unwrap();
        let bob = db.users().create("bob", Some("Bob"), None).await.unwrap();

        let room = db.rooms().create_direct(&alice, &bob).await.unwrap();
        assert_eq!(room.t, "d");

        let stored = db.rooms().find_by_id(&room.id).await.unwrap().unwrap();
        assert_eq!(stored.usernames, vec!["alice", "bob"]);

        // Direct rooms are not reachable by name.
        assert!(db.rooms().find_by_name("alice").await.unwrap().is_none());

        let sub = db
            .subscriptions()
            .find_by_room(&alice.id, &room.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.name, "bob");
        assert_eq!(sub.fname.as_deref(), Some("Bob"));
    }
}
