//! Trait abstractions for the media collaborators.
//!
//! These traits enable dependency injection for testability and modularity.
//! The room session depends on traits rather than concrete implementations.

use async_trait::async_trait;

use crate::error::{ConnectError, PlaybackOpenError, ResolveResult};
use crate::room::{ChannelId, RoomId, Track};

/// Completion callback handed to [`AudioOutput::play`].
///
/// Receives `Some(message)` when playback ended because of an error. May be
/// invoked from any thread.
pub type FinishCallback = Box<dyn FnOnce(Option<String>) + Send + 'static>;

/// Turns user references into playable tracks.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolves a reference into one or more tracks, in play order.
    ///
    /// A playlist reference yields every playable entry; a single item
    /// yields exactly one track.
    async fn resolve(&self, reference: &str) -> ResolveResult<Vec<Track>>;

    /// Resolves a queued track into a stream the audio output can open.
    ///
    /// Called when the track reaches the head of the queue, so short-lived
    /// stream URLs are fetched as late as possible.
    async fn resolve_stream(&self, track: &Track) -> ResolveResult<String>;
}

/// Handle to one room's audio connection.
///
/// Owned exclusively by a single room session.
pub trait AudioOutput: Send + Sync {
    /// Starts playing `stream`.
    ///
    /// On `Ok`, `on_finished` is invoked exactly once when the stream ends,
    /// whether naturally, by error, or because of [`stop`](Self::stop).
    /// On `Err`, `on_finished` is dropped without being invoked.
    fn play(&self, stream: &str, on_finished: FinishCallback) -> Result<(), PlaybackOpenError>;

    /// Stops the current stream. Triggers the pending completion callback.
    fn stop(&self);

    fn pause(&self);

    fn resume(&self);

    fn is_playing(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Leaves the audio channel. Stops any stream first.
    fn disconnect(&self);
}

/// Opens audio connections to a room's channels.
#[async_trait]
pub trait AudioConnector: Send + Sync {
    /// Joins `channel` in `room` and returns the output handle.
    async fn connect(
        &self,
        room: RoomId,
        channel: ChannelId,
    ) -> Result<Box<dyn AudioOutput>, ConnectError>;
}
