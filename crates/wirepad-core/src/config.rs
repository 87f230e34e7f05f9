//! Session configuration
//!
//! There is no config file and no environment override: everything a
//! session needs is derived from the URL of the hosting page, with
//! compiled-in defaults for the timing knobs. The knobs are plain public
//! fields so hosts and tests can tighten them.

use std::time::Duration;

use url::Url;

use crate::error::SyncError;
use crate::room::RoomId;

/// Quiet period before a burst of local edits is broadcast.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// First reconnect delay after a drop.
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Added to the retry delay after each consecutive failed cycle.
pub const RETRY_DELAY_STEP: Duration = Duration::from_millis(5000);

/// Retry delay ceiling.
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(30000);

/// How long the saved indicator stays lit after a save.
pub const SAVED_INDICATOR_HOLD: Duration = Duration::from_secs(2);

/// Configuration for one sync session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint, including the `/ws/<room>` path.
    pub endpoint: Url,
    /// Room this session attaches to.
    pub room: RoomId,
    /// Local edit coalescing window.
    pub debounce_delay: Duration,
    /// Reconnect backoff floor.
    pub initial_retry_delay: Duration,
    /// Reconnect backoff increment.
    pub retry_delay_step: Duration,
    /// Reconnect backoff ceiling.
    pub max_retry_delay: Duration,
}

impl SessionConfig {
    /// Build a session config from the hosting page's URL.
    ///
    /// Secure pages get `wss`, plain `http` gets `ws`. The room is the
    /// page path, with the root mapping to the default room.
    pub fn from_page_url(page: &str) -> Result<Self, SyncError> {
        let parsed: Url = page.parse().map_err(|e: url::ParseError| SyncError::InvalidPageUrl {
            url: page.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match parsed.scheme() {
            "https" | "wss" => "wss",
            "http" | "ws" => "ws",
            other => {
                return Err(SyncError::InvalidPageUrl {
                    url: page.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                })
            }
        };

        let host = parsed.host_str().ok_or_else(|| SyncError::InvalidPageUrl {
            url: page.to_string(),
            reason: "missing host".to_string(),
        })?;

        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let room = RoomId::from_path(parsed.path());

        let endpoint = Url::parse(&format!("{}://{}/ws/{}", scheme, authority, room)).map_err(
            |e| SyncError::InvalidPageUrl {
                url: page.to_string(),
                reason: e.to_string(),
            },
        )?;

        Ok(Self::new(endpoint, room))
    }

    /// Build a config from an explicit endpoint and room, with default
    /// timings.
    pub fn new(endpoint: Url, room: RoomId) -> Self {
        Self {
            endpoint,
            room,
            debounce_delay: DEBOUNCE_DELAY,
            initial_retry_delay: INITIAL_RETRY_DELAY,
            retry_delay_step: RETRY_DELAY_STEP,
            max_retry_delay: MAX_RETRY_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_page_maps_to_ws() {
        let config = SessionConfig::from_page_url("http://localhost:8080/demo").unwrap();
        assert_eq!(config.endpoint.as_str(), "ws://localhost:8080/ws/demo");
        assert_eq!(config.room.as_str(), "demo");
    }

    #[test]
    fn test_secure_page_maps_to_wss() {
        let config = SessionConfig::from_page_url("https://pad.example.com/room1").unwrap();
        assert_eq!(config.endpoint.as_str(), "wss://pad.example.com/ws/room1");
    }

    #[test]
    fn test_root_path_is_global_room() {
        let config = SessionConfig::from_page_url("http://localhost:8080/").unwrap();
        assert_eq!(config.room.as_str(), "global");
        assert_eq!(config.endpoint.as_str(), "ws://localhost:8080/ws/global");
    }

    #[test]
    fn test_default_timings() {
        let config = SessionConfig::from_page_url("http://localhost:8080/demo").unwrap();
        assert_eq!(config.debounce_delay, DEBOUNCE_DELAY);
        assert_eq!(config.initial_retry_delay, Duration::from_millis(2000));
        assert_eq!(config.retry_delay_step, Duration::from_millis(5000));
        assert_eq!(config.max_retry_delay, Duration::from_millis(30000));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let err = SessionConfig::from_page_url("ftp://example.com/demo").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        assert!(SessionConfig::from_page_url("not a url").is_err());
    }
}
