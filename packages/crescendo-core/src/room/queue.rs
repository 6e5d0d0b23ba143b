//! FIFO track queue.
//!
//! Insertion order is play order. The queue itself is plain data; the
//! owning [`RoomSession`](super::RoomSession) guards it with a lock so that
//! batch appends are atomic with respect to snapshots.

use std::collections::VecDeque;

use super::Track;

/// Ordered sequence of tracks waiting to be played.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: VecDeque<Track>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single track to the back.
    pub fn append(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Appends tracks to the back, preserving their order.
    pub fn append_batch(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    /// Removes and returns the head of the queue.
    pub fn pop_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Drops every queued track, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.tracks.len();
        self.tracks.clear();
        removed
    }

    /// Point-in-time copy of the queue in play order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
