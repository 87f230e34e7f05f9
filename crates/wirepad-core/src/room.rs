//! Room identity
//!
//! A room names one shared text buffer on the server. The identifier is
//! derived once from the hosting page's path, never changes for the
//! lifetime of a session, and is reused across reconnects.

use std::fmt;

/// Room used when the page path is empty or root.
pub const DEFAULT_ROOM: &str = "global";

/// Identifies which shared buffer a session attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Derive a room ID from a page path (`/room1` -> `room1`).
    ///
    /// The root path maps to the default room.
    pub fn from_path(path: &str) -> Self {
        let name = path.strip_prefix('/').unwrap_or(path);
        if name.is_empty() {
            RoomId(DEFAULT_ROOM.to_string())
        } else {
            RoomId(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_from_path() {
        assert_eq!(RoomId::from_path("/demo").as_str(), "demo");
        assert_eq!(RoomId::from_path("demo").as_str(), "demo");
    }

    #[test]
    fn test_root_path_is_default_room() {
        assert_eq!(RoomId::from_path("/").as_str(), DEFAULT_ROOM);
        assert_eq!(RoomId::from_path("").as_str(), DEFAULT_ROOM);
    }

    #[test]
    fn test_nested_path_kept_whole() {
        // The non-root portion of the path is the room, slashes and all.
        assert_eq!(RoomId::from_path("/team/notes").as_str(), "team/notes");
    }

    #[test]
    fn test_display() {
        assert_eq!(RoomId::from_path("/demo").to_string(), "demo");
    }
}
