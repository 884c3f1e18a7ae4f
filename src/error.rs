//! Unified error handling for the bridge.
//!
//! Peer handlers return [`HandlerError`]; storage and room-type errors live
//! next to the code that raises them (`db::DbError`, `rooms::RoomTypeError`).

use crate::db::DbError;
use thiserror::Error;

/// Errors that can occur while handling a peer event.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required argument was absent from the event.
    #[error("missing argument: {0}")]
    NeedMoreParams(&'static str),

    #[error("no local user bound to irc nick: {0}")]
    UnknownNick(String),

    #[error("no room for channel: {0}")]
    UnknownRoom(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("malformed peer event: {0}")]
    Malformed(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::UnknownNick(_) => "unknown_nick",
            Self::UnknownRoom(_) => "unknown_room",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Malformed(_) => "malformed",
            Self::Db(_) => "db_error",
        }
    }
}

/// Result type for peer handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::NeedMoreParams("nick").error_code(), "need_more_params");
        assert_eq!(HandlerError::UnknownNick("x".into()).error_code(), "unknown_nick");
        assert_eq!(
            HandlerError::Db(DbError::RoomNotFound("x".into())).error_code(),
            "db_error"
        );
    }

    #[test]
    fn test_handler_error_display() {
        assert_eq!(
            HandlerError::NeedMoreParams("channel").to_string(),
            "missing argument: channel"
        );
        assert_eq!(
            HandlerError::Db(DbError::RoomNotFound("r1".into())).to_string(),
            "room not found: r1"
        );
    }
}
