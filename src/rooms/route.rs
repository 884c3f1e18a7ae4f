//! Route descriptors for room types.

use crate::db::Subscription;
use std::collections::BTreeMap;

/// Named route parameters (`:username` -> `alice`).
pub type RouteParams = BTreeMap<String, String>;

/// A named path template such as `/direct/:username`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteConfig {
    pub name: &'static str,
    pub path: &'static str,
}

impl RouteConfig {
    /// Substitute `:param` segments from `params`.
    ///
    /// Returns `None` if any parameter is missing.
    pub fn path_for(&self, params: &RouteParams) -> Option<String> {
        let segments = self
            .path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(key) => params.get(key).map(String::as_str),
                None => Some(segment),
            })
            .collect::<Option<Vec<_>>>()?;
        Some(segments.join("/"))
    }
}

/// What navigating to a route does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Open the room of `room_type` known by `name`.
    OpenRoom {
        room_type: &'static str,
        name: String,
    },
}

/// The route a room type is reachable through.
pub trait RoomTypeRoute: Send + Sync {
    fn config(&self) -> &RouteConfig;

    /// Resolve navigation to this route.
    fn action(&self, params: &RouteParams) -> Option<RouteAction>;

    /// Route parameters linking to the room behind a subscription.
    fn link(&self, sub: &Subscription) -> RouteParams;

    /// Concrete path linking to the room behind a subscription.
    fn path(&self, sub: &Subscription) -> Option<String> {
        self.config().path_for(&self.link(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let route = RouteConfig {
            name: "direct",
            path: "/direct/:username",
        };
        let mut params = RouteParams::new();
        assert_eq!(route.path_for(&params), None);

        params.insert("username".into(), "alice".into());
        assert_eq!(route.path_for(&params).as_deref(), Some("/direct/alice"));

        let nested = RouteConfig {
            name: "thread",
            path: "/group/:name/thread/:tmid",
        };
        params.insert("name".into(), "ops".into());
        params.insert("tmid".into(), "42".into());
        assert_eq!(nested.path_for(&params).as_deref(), Some("/group/ops/thread/42"));
    }
}
