//! Fixed constants shared across the crate.
//!
//! Tunable values live in [`Config`](crate::config::Config); the values here
//! are defaults and identifiers that callers should not need to change.

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Service identifier reported by the health endpoint.
pub const SERVICE_ID: &str = "crescendo";

/// Title used when the resolver reports a track without one.
pub const DEFAULT_TRACK_TITLE: &str = "Untitled track";

// ─────────────────────────────────────────────────────────────────────────────
// Queue Views
// ─────────────────────────────────────────────────────────────────────────────

/// Number of queue entries rendered per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Idle time after which a queue view stops accepting navigation (seconds).
pub const DEFAULT_VIEW_TIMEOUT_SECS: u64 = 60;

/// Interval between sweeps that drop expired queue views (seconds).
pub const VIEW_SWEEP_INTERVAL_SECS: u64 = 30;

/// Notice shown to anyone other than the requester who tries to page a view.
pub const VIEW_FOREIGN_ACTOR_NOTICE: &str =
    "Only the member who requested this queue can use these controls.";

// ─────────────────────────────────────────────────────────────────────────────
// Capacity
// ─────────────────────────────────────────────────────────────────────────────

/// Capacity of the room event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Default upper bound on concurrently active rooms.
pub const DEFAULT_MAX_ROOMS: usize = 1000;
