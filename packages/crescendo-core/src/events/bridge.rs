//! Bridge implementation that maps room events to broadcast transport.
//!
//! The [`BroadcastEventBridge`] lives at the boundary between the session
//! layer and transport concerns, mapping typed room events onto the
//! WebSocket broadcast channel.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::emitter::EventEmitter;
use super::RoomEvent;

/// Bridges room events to the WebSocket broadcast channel.
///
/// For adapter-specific delivery (e.g. a chat bot posting announcements), the
/// bridge also forwards to an optional external emitter that can be set after
/// construction.
#[derive(Clone)]
pub struct BroadcastEventBridge {
    tx: broadcast::Sender<RoomEvent>,
    /// Optional external emitter for adapter-specific event delivery
    external_emitter: Arc<RwLock<Option<Arc<dyn EventEmitter>>>>,
}

impl BroadcastEventBridge {
    /// Creates a new bridge with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            external_emitter: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets an external emitter that receives every event before broadcast.
    pub fn set_external_emitter(&self, emitter: Arc<dyn EventEmitter>) {
        *self.external_emitter.write() = Some(emitter);
    }

    /// Returns a new receiver for the broadcast channel.
    ///
    /// WebSocket handlers use this to subscribe to events.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }
}

impl EventEmitter for BroadcastEventBridge {
    fn emit_room(&self, event: RoomEvent) {
        if let Some(ref emitter) = *self.external_emitter.read() {
            emitter.emit_room(event.clone());
        }
        if let Err(e) = self.tx.send(event) {
            log::trace!("[EventBridge] No broadcast receivers: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomId;

    #[tokio::test]
    async fn subscribers_and_external_emitter_both_receive() {
        struct Recorder(parking_lot::Mutex<Vec<RoomId>>);
        impl EventEmitter for Recorder {
            fn emit_room(&self, event: RoomEvent) {
                self.0.lock().push(event.room_id());
            }
        }

        let bridge = BroadcastEventBridge::new(8);
        let recorder = Arc::new(Recorder(parking_lot::Mutex::new(Vec::new())));
        bridge.set_external_emitter(recorder.clone());
        let mut rx = bridge.subscribe();

        bridge.emit_room(RoomEvent::QueueExhausted {
            room_id: RoomId(9),
            timestamp: 0,
        });

        assert_eq!(rx.recv().await.unwrap().room_id(), RoomId(9));
        assert_eq!(*recorder.0.lock(), vec![RoomId(9)]);
    }

    #[test]
    fn emitting_without_subscribers_is_harmless() {
        let bridge = BroadcastEventBridge::new(1);
        bridge.emit_room(RoomEvent::Disconnected {
            room_id: RoomId(1),
            timestamp: 0,
        });
    }
}
