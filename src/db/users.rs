//! User repository.
//!
//! Mirrored chat users, their presence status, roles, bridged IRC nickname
//! and per-user preferences.

use super::{DbError, new_id, now};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;

/// Presence status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Away,
    Busy,
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            other => Err(DbError::InvalidStatus(other.to_string())),
        }
    }
}

/// A local chat user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Real name.
    pub name: Option<String>,
    pub status: UserStatus,
    /// Nickname on the bridged IRC network, when this user is mirrored from IRC.
    pub irc_nick: Option<String>,
    pub roles: Vec<String>,
    pub created_at: i64,
}

type UserRow = (String, String, Option<String>, String, Option<String>, String, i64);

const USER_COLUMNS: &str = "id, username, name, status, irc_nick, roles, created_at";

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let (id, username, name, status, irc_nick, roles, created_at) = row;
        Ok(Self {
            id,
            username,
            name,
            status: status.parse()?,
            irc_nick,
            roles: serde_json::from_str(&roles)?,
            created_at,
        })
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with the default `user` role and `offline` status.
    pub async fn create(
        &self,
        username: &str,
        name: Option<&str>,
        irc_nick: Option<&str>,
    ) -> Result<User, DbError> {
        let user = User {
            id: new_id(),
            username: username.to_string(),
            name: name.map(String::from),
            status: UserStatus::Offline,
            irc_nick: irc_nick.map(String::from),
            roles: vec!["user".to_string()],
            created_at: now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, status, irc_nick, roles, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(user.status.as_str())
        .bind(&user.irc_nick)
        .bind(serde_json::to_string(&user.roles)?)
        .bind(user.created_at)
        .execute(self.pool)
        .await
        .map_err(|e| unique_violation(e, username, irc_nick))?;

        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        self.find_one("id = ?", id).await
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.find_one("username = ?", username).await
    }

    /// Find the user mirrored from the given IRC nickname.
    pub async fn find_by_irc_nick(&self, nick: &str) -> Result<Option<User>, DbError> {
        self.find_one("irc_nick = ?", nick).await
    }

    async fn find_one(&self, predicate: &str, value: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Set a user's presence status. Returns false if no such user exists.
    pub async fn set_status(&self, id: &str, status: UserStatus) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE users SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rebind a user's IRC nickname.
    pub async fn set_irc_nick(&self, id: &str, nick: &str) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE users SET irc_nick = ? WHERE id = ?")
            .bind(nick)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    DbError::NickTaken(nick.to_string())
                }
                other => DbError::from(other),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a user's roles.
    pub async fn set_roles(&self, id: &str, roles: &[&str]) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE users SET roles = ? WHERE id = ?")
            .bind(serde_json::to_string(roles)?)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read a stored preference value.
    pub async fn preference(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DbError> {
        let raw = sqlx::query_scalar::<_, String>(
            "SELECT value FROM user_preferences WHERE user_id = ? AND key = ?",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(raw.map(|v| serde_json::from_str(&v)).transpose()?)
    }

    /// Store a preference value, replacing any previous one.
    pub async fn set_preference(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, key, value)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(serde_json::to_string(value)?)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

/// Map a UNIQUE violation on insert to the column that collided.
fn unique_violation(err: sqlx::Error, username: &str, irc_nick: Option<&str>) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        if db_err.message().contains("irc_nick") {
            return DbError::NickTaken(irc_nick.unwrap_or_default().to_string());
        }
        return DbError::UsernameTaken(username.to_string());
    }
    DbError::from(err)
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::new(":memory:").await.unwrap();
        let users = db.users();

        let created = users
            .create("alice", Some("Alice Liddell"), Some("alice_irc"))
            .await
            .unwrap();
        assert_eq!(created.status, UserStatus::Offline);
        assert_eq!(created.roles, vec!["user"]);

        let by_nick = users.find_by_irc_nick("alice_irc").await.unwrap().unwrap();
        assert_eq!(by_nick, created);
        assert_eq!(users.find_by_id(&created.id).await.unwrap(), Some(created));
        assert!(users.find_by_irc_nick("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_nick() {
        let db = Database::new(":memory:").await.unwrap();
        let users = db.users();
        users.create("alice", None, Some("al")).await.unwrap();

        assert!(matches!(
            users.create("alice", None, None).await,
            Err(DbError::UsernameTaken(ref u)) if u == "alice"
        ));
        assert!(matches!(
            users.create("alice2", None, Some("al")).await,
            Err(DbError::NickTaken(ref n)) if n == "al"
        ));
    }

    #[tokio::test]
    async fn test_set_status_and_nick() {
        let db = Database::new(":memory:").await.unwrap();
        let users = db.users();
        let bob = users.create("bob", None, Some("bob")).await.unwrap();

        assert!(users.set_status(&bob.id, UserStatus::Away).await.unwrap());
        assert!(!users.set_status("missing", UserStatus::Away).await.unwrap());
        assert!(users.set_irc_nick(&bob.id, "bobby").await.unwrap());

        let bob = users.find_by_id(&bob.id).await.unwrap().unwrap();
        assert_eq!(bob.status, UserStatus::Away);
        assert_eq!(bob.irc_nick.as_deref(), Some("bobby"));
    }

    #[tokio::test]
    async fn test_preferences_roundtrip_and_overwrite() {
        let db = Database::new(":memory:").await.unwrap();
        let users = db.users();
        let carol = users.create("carol", None, None).await.unwrap();

        assert_eq!(users.preference(&carol.id, "sidebarGroupByType").await.unwrap(), None);

        users
            .set_preference(&carol.id, "sidebarGroupByType", &json!(true))
            .await
            .unwrap();
        users
            .set_preference(&carol.id, "sidebarGroupByType", &json!(false))
            .await
            .unwrap();

        assert_eq!(
            users.preference(&carol.id, "sidebarGroupByType").await.unwrap(),
            Some(json!(false))
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("busy".parse::<UserStatus>().unwrap(), UserStatus::Busy);
        assert!(matches!(
            "dnd".parse::<UserStatus>(),
            Err(DbError::InvalidStatus(_))
        ));
        assert_eq!(UserStatus::Offline.to_string(), "offline");
    }
}
