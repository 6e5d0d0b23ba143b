//! Event emitter abstraction for decoupling sessions from transport.
//!
//! Sessions depend on the [`EventEmitter`] trait rather than concrete broadcast
//! channels, enabling testing and alternative transport implementations.

use super::RoomEvent;

/// Trait for emitting room events without knowledge of transport.
///
/// # Example
///
/// ```ignore
/// struct MyService {
///     emitter: Arc<dyn EventEmitter>,
/// }
///
/// impl MyService {
///     fn announce(&self) {
///         self.emitter.emit_room(RoomEvent::QueueExhausted { ... });
///     }
/// }
/// ```
pub trait EventEmitter: Send + Sync {
    /// Emits a room playback event.
    fn emit_room(&self, event: RoomEvent);
}

/// No-op emitter for embedding or testing.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_room(&self, _event: RoomEvent) {
        // No-op
    }
}

/// Logging emitter for debugging and development.
///
/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_room(&self, event: RoomEvent) {
        tracing::debug!(room_id = %event.room_id(), ?event, "room_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::room::RoomId;

    /// Test emitter that counts events.
    struct CountingEventEmitter {
        room_count: AtomicUsize,
    }

    impl EventEmitter for CountingEventEmitter {
        fn emit_room(&self, _event: RoomEvent) {
            self.room_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn counting_emitter_tracks_events() {
        let emitter = Arc::new(CountingEventEmitter {
            room_count: AtomicUsize::new(0),
        });
        let dyn_emitter: Arc<dyn EventEmitter> = emitter.clone();

        dyn_emitter.emit_room(RoomEvent::QueueExhausted {
            room_id: RoomId(1),
            timestamp: 0,
        });
        dyn_emitter.emit_room(RoomEvent::Disconnected {
            room_id: RoomId(1),
            timestamp: 0,
        });
        LoggingEventEmitter.emit_room(RoomEvent::Disconnected {
            room_id: RoomId(1),
            timestamp: 0,
        });

        assert_eq!(emitter.room_count.load(Ordering::SeqCst), 2);
    }
}
