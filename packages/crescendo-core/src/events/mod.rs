//! Event system for room notifications.
//!
//! This module provides:
//! - [`EventEmitter`] trait for sessions to emit events
//! - [`BroadcastEventBridge`] for WebSocket transport
//! - [`RoomEvent`], the notifications a chat adapter renders
//!
//! Announcements that are not direct replies to the acting user (now playing,
//! a queued track failing to open, the queue running dry) travel this way.

mod bridge;
mod emitter;

pub use bridge::BroadcastEventBridge;
pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

use crate::room::RoomId;

/// Events related to room playback.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoomEvent {
    /// Tracks were appended to a room's queue.
    Enqueued {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        /// Number of tracks appended.
        count: usize,
        /// Title of the first appended track.
        #[serde(rename = "firstTitle")]
        first_title: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A track started playing.
    NowPlaying {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        title: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A queued track could not be opened and was skipped.
    TrackFailed {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        title: String,
        /// Error message describing the failure.
        error: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The last queued track finished and nothing is left to play.
    QueueExhausted {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The room left its audio channel and the session was dropped.
    Disconnected {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

impl RoomEvent {
    /// The room this event belongs to.
    pub fn room_id(&self) -> RoomId {
        match self {
            Self::Enqueued { room_id, .. }
            | Self::NowPlaying { room_id, .. }
            | Self::TrackFailed { room_id, .. }
            | Self::QueueExhausted { room_id, .. }
            | Self::Disconnected { room_id, .. } => *room_id,
        }
    }
}
