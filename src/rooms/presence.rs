//! Presence cache keyed by username.
//!
//! Holds the latest known status of each user so room types can answer
//! status queries without a database round trip. The bridge writes into
//! it as IRC users come and go.

use crate::db::UserStatus;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct PresenceCache {
    statuses: DashMap<String, UserStatus>,
}

impl PresenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, username: &str) -> Option<UserStatus> {
        self.statuses.get(username).map(|s| *s)
    }

    pub fn set(&self, username: &str, status: UserStatus) {
        self.statuses.insert(username.to_string(), status);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_overwrite() {
        let cache = PresenceCache::new();
        assert!(cache.is_empty());

        cache.set("alice", UserStatus::Online);
        cache.set("alice", UserStatus::Away);
        assert_eq!(cache.get("alice"), Some(UserStatus::Away));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("bob"), None);
    }
}
