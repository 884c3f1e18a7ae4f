//! Permission checks consulted by room types.

use super::RoomTypeError;
use crate::db::Database;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Answers whether a user holds a named permission.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Whether `user_id` holds `permission`. Anonymous viewers hold nothing.
    async fn has_permission(
        &self,
        user_id: Option<&str>,
        permission: &str,
    ) -> Result<bool, RoomTypeError>;

    /// Whether `user_id` holds any of `permissions`.
    async fn has_at_least_one_permission(
        &self,
        user_id: Option<&str>,
        permissions: &[&str],
    ) -> Result<bool, RoomTypeError> {
        for permission in permissions {
            if self.has_permission(user_id, permission).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Role-based permissions: each permission is granted to a set of roles,
/// and a user holds it when any of their roles is in that set.
pub struct RolePermissions {
    db: Database,
    grants: HashMap<String, HashSet<String>>,
}

impl RolePermissions {
    /// Build from the `[permissions]` config table.
    pub fn new(db: Database, grants: &HashMap<String, Vec<String>>) -> Self {
        let grants = grants
            .iter()
            .map(|(perm, roles)| (perm.clone(), roles.iter().cloned().collect()))
            .collect();
        Self { db, grants }
    }
}

#[async_trait]
impl PermissionChecker for RolePermissions {
    async fn has_permission(
        &self,
        user_id: Option<&str>,
        permission: &str,
    ) -> Result<bool, RoomTypeError> {
        let (Some(user_id), Some(roles)) = (user_id, self.grants.get(permission)) else {
            return Ok(false);
        };

        let Some(user) = self.db.users().find_by_id(user_id).await? else {
            return Ok(false);
        };

        Ok(user.roles.iter().any(|r| roles.contains(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_role_grants() {
        let db = Database::new(":memory:").await.unwrap();
        let alice = db.users().create("alice", None, None).await.unwrap();
        let guest = db.users().create("guest", None, None).await.unwrap();
        db.users().set_roles(&guest.id, &["anonymous"]).await.unwrap();

        let mut grants = HashMap::new();
        grants.insert("view-d-room".to_string(), vec!["user".to_string(), "admin".to_string()]);
        grants.insert("view-joined-room".to_string(), vec!["anonymous".to_string()]);
        let perms = RolePermissions::new(db.clone(), &grants);

        assert!(perms.has_permission(Some(&alice.id), "view-d-room").await.unwrap());
        assert!(!perms.has_permission(Some(&guest.id), "view-d-room").await.unwrap());
        assert!(!perms.has_permission(None, "view-d-room").await.unwrap());
        assert!(!perms.has_permission(Some("missing"), "view-d-room").await.unwrap());
        assert!(!perms.has_permission(Some(&alice.id), "unknown-perm").await.unwrap());

        assert!(
            perms
                .has_at_least_one_permission(Some(&guest.id), &["view-d-room", "view-joined-room"])
                .await
                .unwrap()
        );
        assert!(
            !perms
                .has_at_least_one_permission(Some(&guest.id), &["view-d-room"])
                .await
                .unwrap()
        );
    }
}
