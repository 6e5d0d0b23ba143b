//! Hand-written collaborators shared by the session, registry and service tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{ConnectError, PlaybackOpenError, ResolutionError, ResolveResult};
use crate::events::{EventEmitter, RoomEvent};
use crate::media::{AudioConnector, AudioOutput, FinishCallback, TrackResolver};
use crate::room::{ChannelId, RoomId, SessionDeps, Track};

pub const CHANNEL: Option<ChannelId> = Some(ChannelId(7));

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves every reference to a single track titled after it, unless told
/// otherwise.
#[derive(Default)]
pub struct StaticResolver {
    registered: Mutex<HashMap<String, ResolveResult<Vec<Track>>>>,
    broken_streams: Mutex<HashSet<String>>,
    reference_gates: Mutex<HashMap<String, Arc<Notify>>>,
    stream_gates: Mutex<HashMap<String, Arc<Notify>>>,
    stream_calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `reference` resolves to `count` tracks named `{reference}-{n}`.
    pub fn playlist(&self, reference: &str, count: usize) {
        let tracks = (1..=count)
            .map(|n| Track::new(format!("{reference}-{n}"), format!("{reference}-{n}")))
            .collect();
        self.registered.lock().insert(reference.to_string(), Ok(tracks));
    }

    pub fn fail_reference(&self, reference: &str) {
        self.registered.lock().insert(
            reference.to_string(),
            Err(ResolutionError::NotFound(reference.to_string())),
        );
    }

    pub fn fail_stream(&self, source_ref: &str) {
        self.broken_streams.lock().insert(source_ref.to_string());
    }

    /// First-stage resolution of `reference` blocks until the returned gate is notified.
    pub fn hold_reference(&self, reference: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.reference_gates
            .lock()
            .insert(reference.to_string(), Arc::clone(&gate));
        gate
    }

    /// Stream resolution of `source_ref` blocks until the returned gate is notified.
    pub fn hold_stream(&self, source_ref: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.stream_gates
            .lock()
            .insert(source_ref.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackResolver for StaticResolver {
    async fn resolve(&self, reference: &str) -> ResolveResult<Vec<Track>> {
        let gate = self.reference_gates.lock().get(reference).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.registered
            .lock()
            .get(reference)
            .cloned()
            .unwrap_or_else(|| Ok(vec![Track::new(reference, reference)]))
    }

    async fn resolve_stream(&self, track: &Track) -> ResolveResult<String> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.stream_gates.lock().get(track.source_ref()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.broken_streams.lock().contains(track.source_ref()) {
            return Err(ResolutionError::NotFound(track.source_ref().to_string()));
        }
        Ok(format!("stream://{}", track.source_ref()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio
// ─────────────────────────────────────────────────────────────────────────────

/// What a [`ManualOutput`] has been asked to do. Completions fire only when a
/// test says so, or on `stop`, and always from a separate OS thread.
#[derive(Default)]
pub struct OutputLog {
    plays: Mutex<Vec<String>>,
    pending: Mutex<Option<FinishCallback>>,
    refused: Mutex<HashSet<String>>,
    paused: AtomicBool,
    stops: AtomicUsize,
    disconnects: AtomicUsize,
}

impl OutputLog {
    pub fn plays(&self) -> Vec<String> {
        self.plays.lock().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Makes `play` reject `stream`.
    pub fn refuse(&self, stream: &str) {
        self.refused.lock().insert(stream.to_string());
    }

    /// Ends the current track as the transport would. Returns `false` when
    /// nothing was playing.
    pub fn finish(&self, error: Option<String>) -> bool {
        let Some(callback) = self.pending.lock().take() else {
            return false;
        };
        thread::spawn(move || callback(error))
            .join()
            .expect("completion thread panicked");
        true
    }
}

pub struct ManualOutput {
    log: Arc<OutputLog>,
}

impl AudioOutput for ManualOutput {
    fn play(&self, stream: &str, on_finished: FinishCallback) -> Result<(), PlaybackOpenError> {
        if self.log.refused.lock().contains(stream) {
            return Err(PlaybackOpenError::Output(format!("cannot open {stream}")));
        }
        self.log.plays.lock().push(stream.to_string());
        self.log.paused.store(false, Ordering::SeqCst);
        *self.log.pending.lock() = Some(on_finished);
        Ok(())
    }

    fn stop(&self) {
        self.log.stops.fetch_add(1, Ordering::SeqCst);
        self.log.finish(None);
    }

    fn pause(&self) {
        self.log.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.log.paused.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.log.pending.lock().is_some() && !self.is_paused()
    }

    fn is_paused(&self) -> bool {
        self.log.is_paused()
    }

    fn disconnect(&self) {
        self.log.disconnects.fetch_add(1, Ordering::SeqCst);
        self.log.pending.lock().take();
    }
}

#[derive(Default)]
pub struct ManualConnector {
    pub log: Arc<OutputLog>,
    connects: AtomicUsize,
    refuse: AtomicBool,
}

impl ManualConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn refuse_connections(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioConnector for ManualConnector {
    async fn connect(
        &self,
        _room: RoomId,
        channel: ChannelId,
    ) -> Result<Box<dyn AudioOutput>, ConnectError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ConnectError::ChannelUnavailable(channel));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ManualOutput {
            log: Arc::clone(&self.log),
        }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<RoomEvent>>,
}

impl RecordingEmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn now_playing(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RoomEvent::NowPlaying { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failed(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RoomEvent::TrackFailed { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn exhausted(&self) -> usize {
        self.count(|event| matches!(event, RoomEvent::QueueExhausted { .. }))
    }

    pub fn disconnected(&self) -> usize {
        self.count(|event| matches!(event, RoomEvent::Disconnected { .. }))
    }

    fn count(&self, predicate: impl Fn(&RoomEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|event| predicate(event)).count()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit_room(&self, event: RoomEvent) {
        self.events.lock().push(event);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Collaborators for one test, kept around so assertions can inspect them.
pub struct Harness {
    pub resolver: Arc<StaticResolver>,
    pub connector: Arc<ManualConnector>,
    pub emitter: Arc<RecordingEmitter>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            resolver: StaticResolver::new(),
            connector: ManualConnector::new(),
            emitter: RecordingEmitter::new(),
        }
    }

    pub fn output(&self) -> &OutputLog {
        &self.connector.log
    }

    pub fn deps(&self, auto_leave_on_empty: bool) -> SessionDeps {
        SessionDeps {
            resolver: self.resolver.clone(),
            connector: self.connector.clone(),
            emitter: self.emitter.clone(),
            auto_leave_on_empty,
        }
    }
}
