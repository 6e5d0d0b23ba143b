//! Core configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_ROOMS, DEFAULT_PAGE_SIZE, DEFAULT_VIEW_TIMEOUT_SECS, EVENT_CHANNEL_CAPACITY,
};

/// Configuration for the Crescendo core services.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    // Playback
    /// Disconnect and drop the room session once the last queued track
    /// finishes. When `false`, the room stays connected and idle.
    pub auto_leave_on_empty: bool,

    /// Upper bound on concurrently active rooms.
    pub max_rooms: usize,

    // Queue views
    /// Number of entries rendered per queue page.
    pub page_size: usize,

    /// Idle time after which a queue view stops accepting navigation (seconds).
    pub view_timeout_secs: u64,

    // Events
    /// Capacity of the room event broadcast channel.
    pub event_channel_capacity: usize,
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rooms == 0 {
            return Err("max_rooms must be >= 1".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be >= 1".to_string());
        }
        if self.event_channel_capacity == 0 {
            return Err(
                "event_channel_capacity must be >= 1 (broadcast::channel panics on 0)".to_string(),
            );
        }
        Ok(())
    }

    /// Idle timeout for queue views.
    #[must_use]
    pub fn view_timeout(&self) -> Duration {
        Duration::from_secs(self.view_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_leave_on_empty: true,
            max_rooms: DEFAULT_MAX_ROOMS,
            page_size: DEFAULT_PAGE_SIZE,
            view_timeout_secs: DEFAULT_VIEW_TIMEOUT_SECS,
            event_channel_capacity: EVENT_CHANNEL_CAPACITY,
        }
    }
}
