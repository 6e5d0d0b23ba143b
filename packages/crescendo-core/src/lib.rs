//! Crescendo Core - per-room media playback orchestration.
//!
//! This crate runs one sequential playback queue per room: users enqueue
//! references (URLs or search text), the room plays them one after another on
//! its audio output, and control commands (skip, pause, resume, clear, leave)
//! act on whatever is current. It is designed to be driven by a chat bot
//! adapter or by the standalone HTTP server.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`room`]: Tracks, queues, the per-room session state machine, queue views
//! - [`services`]: Room registry, view store and the [`Jukebox`] command surface
//! - [`media`]: Reference resolution and audio output
//! - [`events`]: Room notifications for adapters and WebSocket clients
//! - [`api`]: HTTP/WebSocket surface
//! - [`runtime`]: Task spawning abstraction for async runtime independence
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! The crate defines several traits to decouple core logic from concrete
//! implementations:
//!
//! - [`TaskSpawner`](runtime::TaskSpawner): Spawning background tasks
//! - [`EventEmitter`](events::EventEmitter): Emitting room events
//! - [`TrackResolver`](media::TrackResolver): Turning references into tracks and streams
//! - [`AudioConnector`](media::AudioConnector) / [`AudioOutput`](media::AudioOutput):
//!   Joining an audio channel and playing streams on it
//!
//! Each trait has an implementation suitable for the standalone server.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod media;
pub mod room;
pub mod runtime;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{
    ConnectError, CrescendoError, CrescendoResult, ErrorCode, PlaybackOpenError, ResolutionError,
    ResolveResult,
};
pub use events::{
    BroadcastEventBridge, EventEmitter, LoggingEventEmitter, NoopEventEmitter, RoomEvent,
};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use utils::now_millis;

// Re-export room types
pub use room::{
    ChannelId, ControlCommand, ControlOutcome, EnqueueReceipt, NavigationDirection,
    NavigationOutcome, NoOpReason, PlaybackState, QueuePage, QueuePaginationView, RoomId,
    RoomSession, RoomSnapshot, Track, UserId,
};

// Re-export media types
pub use media::{AudioConnector, AudioOutput, SimulatedConnector, TrackResolver, YtDlpResolver};

// Re-export service types
pub use services::{Jukebox, OpenedQueueView, PlayRequest, QueueViewStore, RoomRegistry};

// Re-export bootstrap types
pub use bootstrap::{bootstrap_services, BootstrappedServices};

// Re-export API types
pub use api::{start_server, AppState, ServerError};
