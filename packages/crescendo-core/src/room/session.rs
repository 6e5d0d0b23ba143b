//! Room session: the per-room playback state machine.
//!
//! Every room is driven by one worker task that owns the audio output and is
//! the only writer of the room's state. Handles talk to it through a mailbox:
//!
//! - `enqueue` resolves the reference on the caller's task, then hands the
//!   result to the worker, which appends it in the order the requests were
//!   issued (each request takes a ticket up front).
//! - Completion callbacks fire on whatever thread the audio output uses; they
//!   only post `Finished { token }` back to the mailbox.
//! - Every transition that changes what should be playing bumps the
//!   `advance_token`, so completions for a track that is no longer current are
//!   recognised and dropped.
//!
//! Readers (`snapshot`, `current_track`, `state`) take the shared read lock
//! and never wait on the worker.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::{ChannelId, Queue, RoomId, Track};
use crate::error::{
    CrescendoError, CrescendoResult, PlaybackOpenError, ResolutionError, ResolveResult,
};
use crate::events::{EventEmitter, RoomEvent};
use crate::media::{AudioConnector, AudioOutput, FinishCallback, TrackResolver};
use crate::runtime::TaskSpawner;
use crate::utils::now_millis;

/// Playback state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    /// Terminal. The session is gone and a new one must be created.
    Disconnected,
}

/// Point-in-time view of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub state: PlaybackState,
    pub current: Option<Track>,
    /// Tracks waiting behind `current`, in play order.
    pub queue: Vec<Track>,
}

impl RoomSnapshot {
    /// Snapshot for a room that has no session.
    pub fn empty() -> Self {
        Self {
            state: PlaybackState::Idle,
            current: None,
            queue: Vec::new(),
        }
    }
}

/// Acknowledgement for an accepted `play` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueReceipt {
    /// Number of tracks appended.
    pub added: usize,
    pub first_title: String,
    /// Whether the room was idle and playback started with this request.
    pub starts_now: bool,
}

/// Playback controls routed through the session worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCommand {
    Skip,
    Pause,
    Resume,
    Clear,
    Leave,
}

/// Why a control request changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    NothingPlaying,
    NotPaused,
    NotConnected,
    /// The track the request was aimed at had already ended.
    TrackChanged,
}

/// Result of a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ControlOutcome {
    Done,
    NoOp { reason: NoOpReason },
}

impl ControlOutcome {
    pub(crate) fn no_op(reason: NoOpReason) -> Self {
        Self::NoOp { reason }
    }

    /// What a command reports when the room has no session at all.
    pub(crate) fn without_session(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Skip | ControlCommand::Pause => Self::no_op(NoOpReason::NothingPlaying),
            ControlCommand::Resume => Self::no_op(NoOpReason::NotPaused),
            ControlCommand::Leave => Self::no_op(NoOpReason::NotConnected),
            ControlCommand::Clear => Self::Done,
        }
    }
}

/// Collaborators every session is built with.
#[derive(Clone)]
pub struct SessionDeps {
    pub resolver: Arc<dyn TrackResolver>,
    pub connector: Arc<dyn AudioConnector>,
    pub emitter: Arc<dyn EventEmitter>,
    /// Tear the session down once the queue runs dry.
    pub auto_leave_on_empty: bool,
}

/// Invoked by the worker after teardown with the room and session generation.
pub type CloseHook = Box<dyn FnOnce(RoomId, u64) + Send + Sync + 'static>;

// ─────────────────────────────────────────────────────────────────────────────
// Shared State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct RoomState {
    state: PlaybackState,
    current: Option<Track>,
    queue: Queue,
    advance_token: u64,
}

struct Shared {
    room: RwLock<RoomState>,
    /// Next enqueue ticket to hand out.
    tickets: AtomicU64,
}

enum RoomMessage {
    Enqueue {
        ticket: u64,
        resolved: ResolveResult<Vec<Track>>,
        channel: Option<ChannelId>,
        reply: oneshot::Sender<CrescendoResult<EnqueueReceipt>>,
    },
    /// The request holding `ticket` was dropped before it was submitted.
    Withdraw {
        ticket: u64,
    },
    Finished {
        token: u64,
        error: Option<String>,
    },
    Control {
        command: ControlCommand,
        /// `advance_token` when the request was issued.
        token: u64,
        reply: oneshot::Sender<ControlOutcome>,
    },
    #[cfg(test)]
    Flush {
        reply: oneshot::Sender<()>,
    },
}

enum PendingEnqueue {
    Ready {
        resolved: ResolveResult<Vec<Track>>,
        channel: Option<ChannelId>,
        reply: oneshot::Sender<CrescendoResult<EnqueueReceipt>>,
    },
    Withdrawn,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to one room's playback session.
pub struct RoomSession {
    room_id: RoomId,
    generation: u64,
    tx: mpsc::UnboundedSender<RoomMessage>,
    shared: Arc<Shared>,
    resolver: Arc<dyn TrackResolver>,
    /// Cancelled by an explicit leave so in-flight work is discarded.
    cancel: CancellationToken,
}

impl RoomSession {
    /// Starts the worker for `room_id` and returns its handle.
    ///
    /// `on_closed` runs once, on the worker, after the session has torn down.
    pub fn spawn<S: TaskSpawner>(
        room_id: RoomId,
        generation: u64,
        deps: SessionDeps,
        spawner: &S,
        on_closed: CloseHook,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            room: RwLock::new(RoomState {
                state: PlaybackState::Idle,
                current: None,
                queue: Queue::new(),
                advance_token: 0,
            }),
            tickets: AtomicU64::new(0),
        });
        let cancel = CancellationToken::new();

        let worker = RoomWorker {
            room_id,
            generation,
            shared: Arc::clone(&shared),
            mailbox: tx.downgrade(),
            cancel: cancel.clone(),
            audio: None,
            resolver: Arc::clone(&deps.resolver),
            connector: deps.connector,
            emitter: deps.emitter,
            auto_leave_on_empty: deps.auto_leave_on_empty,
            pending: BTreeMap::new(),
            next_ticket: 0,
            on_closed: Some(on_closed),
            closed: false,
        };
        spawner.spawn(worker.run(rx));

        log::info!(
            "[RoomSession] Room {} session #{} started",
            room_id,
            generation
        );

        Arc::new(Self {
            room_id,
            generation,
            tx,
            shared,
            resolver: deps.resolver,
            cancel,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Distinguishes successive sessions for the same room.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the session has torn down (or its worker is gone).
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed() || self.state() == PlaybackState::Disconnected
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.room.read().state
    }

    pub fn current_track(&self) -> Option<Track> {
        self.shared.room.read().current.clone()
    }

    /// Consistent view of state, current track and queue.
    pub fn snapshot(&self) -> RoomSnapshot {
        let room = self.shared.room.read();
        RoomSnapshot {
            state: room.state,
            current: room.current.clone(),
            queue: room.queue.snapshot(),
        }
    }

    pub(crate) fn advance_token(&self) -> u64 {
        self.shared.room.read().advance_token
    }

    /// Resolves `reference` and appends the result to the queue.
    ///
    /// `channel` is the requester's audio channel, used to connect when the
    /// room is not connected yet. Requests are appended in the order this
    /// method was called, regardless of how long each resolution takes. A
    /// resolution failure is returned without touching the room.
    pub async fn enqueue(
        &self,
        reference: &str,
        channel: Option<ChannelId>,
    ) -> CrescendoResult<EnqueueReceipt> {
        if self.is_closed() {
            return Err(CrescendoError::SessionClosed);
        }

        let ticket = EnqueueTicket::issue(self);
        let resolved = self
            .resolver
            .resolve(reference)
            .await
            .and_then(|tracks| {
                if tracks.is_empty() {
                    Err(ResolutionError::NoTracks(reference.to_string()))
                } else {
                    Ok(tracks)
                }
            });
        if let Err(ref e) = resolved {
            log::info!(
                "[RoomSession] Room {} could not resolve {:?}: {}",
                self.room_id,
                reference,
                e
            );
        }

        let (reply, response) = oneshot::channel();
        if !ticket.submit(resolved, channel, reply) {
            return Err(self.closed_error());
        }
        response.await.unwrap_or_else(|_| Err(self.closed_error()))
    }

    pub async fn skip(&self) -> ControlOutcome {
        self.control(ControlCommand::Skip).await
    }

    pub async fn pause(&self) -> ControlOutcome {
        self.control(ControlCommand::Pause).await
    }

    pub async fn resume(&self) -> ControlOutcome {
        self.control(ControlCommand::Resume).await
    }

    pub async fn clear(&self) -> ControlOutcome {
        self.control(ControlCommand::Clear).await
    }

    /// Disconnects and tears the session down. Work still in flight for this
    /// room is discarded.
    pub async fn leave(&self) -> ControlOutcome {
        self.control(ControlCommand::Leave).await
    }

    pub async fn control(&self, command: ControlCommand) -> ControlOutcome {
        if command == ControlCommand::Leave {
            self.cancel.cancel();
        }

        let token = self.advance_token();
        let (reply, response) = oneshot::channel();
        if self
            .tx
            .send(RoomMessage::Control {
                command,
                token,
                reply,
            })
            .is_err()
        {
            return ControlOutcome::without_session(command);
        }
        response
            .await
            .unwrap_or_else(|_| ControlOutcome::without_session(command))
    }

    fn closed_error(&self) -> CrescendoError {
        if self.cancel.is_cancelled() {
            CrescendoError::Cancelled
        } else {
            CrescendoError::SessionClosed
        }
    }
}

#[cfg(test)]
impl RoomSession {
    /// Resolves once the worker has handled everything sent before this call.
    pub(crate) async fn flush(&self) {
        let (reply, response) = oneshot::channel();
        if self.tx.send(RoomMessage::Flush { reply }).is_ok() {
            let _ = response.await;
        }
    }

    /// Delivers a completion as if an audio output had fired it.
    pub(crate) fn inject_completion(&self, token: u64, error: Option<String>) {
        let _ = self.tx.send(RoomMessage::Finished { token, error });
    }
}

impl std::fmt::Debug for RoomSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomSession")
            .field("room_id", &self.room_id)
            .field("generation", &self.generation)
            .field("state", &self.state())
            .finish()
    }
}

/// Place in the apply order, held while an enqueue resolves.
///
/// Dropping an unsubmitted ticket (the caller's future was cancelled) tells
/// the worker to skip it, so later requests are not held up.
struct EnqueueTicket<'a> {
    session: &'a RoomSession,
    id: u64,
    submitted: bool,
}

impl<'a> EnqueueTicket<'a> {
    fn issue(session: &'a RoomSession) -> Self {
        let id = session.shared.tickets.fetch_add(1, Ordering::SeqCst);
        Self {
            session,
            id,
            submitted: false,
        }
    }

    fn submit(
        mut self,
        resolved: ResolveResult<Vec<Track>>,
        channel: Option<ChannelId>,
        reply: oneshot::Sender<CrescendoResult<EnqueueReceipt>>,
    ) -> bool {
        self.submitted = true;
        self.session
            .tx
            .send(RoomMessage::Enqueue {
                ticket: self.id,
                resolved,
                channel,
                reply,
            })
            .is_ok()
    }
}

impl Drop for EnqueueTicket<'_> {
    fn drop(&mut self) {
        if !self.submitted {
            let _ = self
                .session
                .tx
                .send(RoomMessage::Withdraw { ticket: self.id });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Worker
// ─────────────────────────────────────────────────────────────────────────────

enum OpenOutcome {
    Playing,
    Failed,
    /// The room was left while the stream was being resolved.
    Cancelled,
}

struct RoomWorker {
    room_id: RoomId,
    generation: u64,
    shared: Arc<Shared>,
    /// Weak so that only handles and in-flight completions keep the worker alive.
    mailbox: mpsc::WeakUnboundedSender<RoomMessage>,
    cancel: CancellationToken,
    audio: Option<Box<dyn AudioOutput>>,
    resolver: Arc<dyn TrackResolver>,
    connector: Arc<dyn AudioConnector>,
    emitter: Arc<dyn EventEmitter>,
    auto_leave_on_empty: bool,
    pending: BTreeMap<u64, PendingEnqueue>,
    next_ticket: u64,
    on_closed: Option<CloseHook>,
    closed: bool,
}

impl RoomWorker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RoomMessage>) {
        while let Some(message) = rx.recv().await {
            self.handle(message).await;
            if self.closed {
                break;
            }
        }
        if !self.closed {
            self.teardown("all handles dropped");
        }

        // Anything still queued gets a closed answer when its reply sender drops.
        rx.close();
        log::debug!(
            "[RoomSession] Room {} session #{} worker exited",
            self.room_id,
            self.generation
        );
    }

    async fn handle(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Enqueue {
                ticket,
                resolved,
                channel,
                reply,
            } => {
                self.pending.insert(
                    ticket,
                    PendingEnqueue::Ready {
                        resolved,
                        channel,
                        reply,
                    },
                );
                self.drain_pending().await;
            }
            RoomMessage::Withdraw { ticket } => {
                self.pending.insert(ticket, PendingEnqueue::Withdrawn);
                self.drain_pending().await;
            }
            RoomMessage::Finished { token, error } => self.on_finished(token, error).await,
            RoomMessage::Control {
                command,
                token,
                reply,
            } => {
                let outcome = self.control(command, token);
                let _ = reply.send(outcome);
            }
            #[cfg(test)]
            RoomMessage::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }

    /// Applies every pending enqueue whose turn has come.
    async fn drain_pending(&mut self) {
        while let Some(entry) = self.pending.remove(&self.next_ticket) {
            self.next_ticket += 1;
            let PendingEnqueue::Ready {
                resolved,
                channel,
                reply,
            } = entry
            else {
                continue;
            };

            let result = self.apply_enqueue(resolved, channel).await;
            let starts_now = matches!(result, Ok(ref receipt) if receipt.starts_now);
            // Start before replying so the requester sees the new current track.
            let next = if starts_now { self.begin_next() } else { None };
            let _ = reply.send(result);

            if let Some((track, token)) = next {
                if let OpenOutcome::Failed = self.open_track(&track, token).await {
                    self.start_next().await;
                }
            }
            if self.closed {
                return;
            }
        }
        self.close_if_abandoned();
    }

    async fn apply_enqueue(
        &mut self,
        resolved: ResolveResult<Vec<Track>>,
        channel: Option<ChannelId>,
    ) -> CrescendoResult<EnqueueReceipt> {
        if self.cancel.is_cancelled() {
            return Err(CrescendoError::Cancelled);
        }
        let tracks = resolved?;

        if self.audio.is_none() {
            let channel = channel.ok_or(CrescendoError::NotInChannel)?;
            let audio = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(CrescendoError::Cancelled),
                result = self.connector.connect(self.room_id, channel) => result?,
            };
            log::info!(
                "[RoomSession] Room {} connected to channel {}",
                self.room_id,
                channel
            );
            self.audio = Some(audio);
        }

        let added = tracks.len();
        let first_title = tracks
            .first()
            .map(|track| track.title().to_string())
            .unwrap_or_default();

        let starts_now = {
            let mut room = self.shared.room.write();
            room.queue.append_batch(tracks);
            room.state == PlaybackState::Idle
        };

        log::info!(
            "[RoomSession] Room {} queued {} track(s) starting with {:?}",
            self.room_id,
            added,
            first_title
        );
        self.emit(RoomEvent::Enqueued {
            room_id: self.room_id,
            count: added,
            first_title: first_title.clone(),
            timestamp: now_millis(),
        });

        Ok(EnqueueReceipt {
            added,
            first_title,
            starts_now,
        })
    }

    /// Advances until a track is playing, the queue runs dry, or the room is left.
    async fn start_next(&mut self) {
        if self.mailbox.upgrade().is_none() {
            // No handle left to deliver completions back to us.
            self.teardown("all handles dropped");
            return;
        }
        while let Some((track, token)) = self.begin_next() {
            match self.open_track(&track, token).await {
                OpenOutcome::Failed => continue,
                OpenOutcome::Playing | OpenOutcome::Cancelled => return,
            }
        }
    }

    /// Pops the next track and makes it current, or goes idle when none is left.
    fn begin_next(&mut self) -> Option<(Track, u64)> {
        let next = {
            let mut room = self.shared.room.write();
            room.advance_token += 1;
            match room.queue.pop_front() {
                Some(track) => {
                    room.current = Some(track.clone());
                    room.state = PlaybackState::Playing;
                    Some((track, room.advance_token))
                }
                None => {
                    room.current = None;
                    room.state = PlaybackState::Idle;
                    None
                }
            }
        };

        if next.is_none() {
            log::info!("[RoomSession] Room {} queue exhausted", self.room_id);
            self.emit(RoomEvent::QueueExhausted {
                room_id: self.room_id,
                timestamp: now_millis(),
            });
            if self.auto_leave_on_empty {
                self.teardown("queue exhausted");
            }
        }
        next
    }

    async fn open_track(&mut self, track: &Track, token: u64) -> OpenOutcome {
        let stream = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                log::debug!(
                    "[RoomSession] Room {} left while opening {:?}, discarding",
                    self.room_id,
                    track.title()
                );
                return OpenOutcome::Cancelled;
            }
            result = self.resolver.resolve_stream(track) => result,
        };

        let opened = stream
            .map_err(PlaybackOpenError::from)
            .and_then(|url| self.play_stream(&url, token));

        match opened {
            Ok(()) => {
                log::info!(
                    "[RoomSession] Room {} now playing {:?}",
                    self.room_id,
                    track.title()
                );
                self.emit(RoomEvent::NowPlaying {
                    room_id: self.room_id,
                    title: track.title().to_string(),
                    timestamp: now_millis(),
                });
                OpenOutcome::Playing
            }
            Err(e) => {
                log::warn!(
                    "[RoomSession] Room {} failed to open {:?}: {}",
                    self.room_id,
                    track.title(),
                    e
                );
                self.emit(RoomEvent::TrackFailed {
                    room_id: self.room_id,
                    title: track.title().to_string(),
                    error: e.to_string(),
                    timestamp: now_millis(),
                });
                OpenOutcome::Failed
            }
        }
    }

    fn play_stream(&self, url: &str, token: u64) -> Result<(), PlaybackOpenError> {
        let audio = self.audio.as_ref().ok_or(PlaybackOpenError::NotConnected)?;
        let mailbox = self
            .mailbox
            .upgrade()
            .ok_or(PlaybackOpenError::NotConnected)?;

        let on_finished: FinishCallback = Box::new(move |error| {
            // Runs on the output's thread; only hand the signal over.
            let _ = mailbox.send(RoomMessage::Finished { token, error });
        });
        audio.play(url, on_finished)
    }

    async fn on_finished(&mut self, token: u64, error: Option<String>) {
        let current = {
            let room = self.shared.room.read();
            room.advance_token == token
                && matches!(room.state, PlaybackState::Playing | PlaybackState::Paused)
        };
        if !current {
            log::debug!(
                "[RoomSession] Room {} ignoring stale completion (token {})",
                self.room_id,
                token
            );
            return;
        }

        if let Some(error) = error {
            log::warn!(
                "[RoomSession] Room {} track ended with error: {}",
                self.room_id,
                error
            );
        }
        self.start_next().await;
    }

    fn control(&mut self, command: ControlCommand, issued_at: u64) -> ControlOutcome {
        let (state, token) = {
            let room = self.shared.room.read();
            (room.state, room.advance_token)
        };
        match command {
            // A skip only stops the track that was current when it was issued.
            ControlCommand::Skip if issued_at != token => {
                log::debug!(
                    "[RoomSession] Room {} ignoring skip for an earlier track (token {})",
                    self.room_id,
                    issued_at
                );
                ControlOutcome::no_op(NoOpReason::TrackChanged)
            }
            ControlCommand::Skip => match (&self.audio, state) {
                (Some(audio), PlaybackState::Playing | PlaybackState::Paused) => {
                    // The resulting completion advances the queue.
                    audio.stop();
                    ControlOutcome::Done
                }
                _ => ControlOutcome::no_op(NoOpReason::NothingPlaying),
            },
            ControlCommand::Pause => match (&self.audio, state) {
                (Some(audio), PlaybackState::Playing) => {
                    audio.pause();
                    self.shared.room.write().state = PlaybackState::Paused;
                    ControlOutcome::Done
                }
                _ => ControlOutcome::no_op(NoOpReason::NothingPlaying),
            },
            ControlCommand::Resume => match (&self.audio, state) {
                (Some(audio), PlaybackState::Paused) => {
                    audio.resume();
                    self.shared.room.write().state = PlaybackState::Playing;
                    ControlOutcome::Done
                }
                _ => ControlOutcome::no_op(NoOpReason::NotPaused),
            },
            ControlCommand::Clear => {
                let removed = self.shared.room.write().queue.clear();
                log::info!(
                    "[RoomSession] Room {} cleared {} queued track(s)",
                    self.room_id,
                    removed
                );
                ControlOutcome::Done
            }
            ControlCommand::Leave => {
                let connected = self.audio.is_some();
                self.teardown("left");
                if connected {
                    ControlOutcome::Done
                } else {
                    ControlOutcome::no_op(NoOpReason::NotConnected)
                }
            }
        }
    }

    /// Closes a session nobody is using: a first request failed before the
    /// room ever connected and nothing else is on its way.
    fn close_if_abandoned(&mut self) {
        if self.closed || self.audio.is_some() || !self.pending.is_empty() {
            return;
        }
        if self.shared.tickets.load(Ordering::SeqCst) != self.next_ticket {
            return;
        }
        let idle = {
            let room = self.shared.room.read();
            room.state == PlaybackState::Idle && room.queue.is_empty()
        };
        if idle {
            self.teardown("nothing to play");
        }
    }

    fn teardown(&mut self, reason: &str) {
        if self.closed {
            return;
        }
        self.closed = true;

        let audio = self.audio.take();
        if let Some(ref audio) = audio {
            audio.disconnect();
        }

        let dropped = {
            let mut room = self.shared.room.write();
            room.state = PlaybackState::Disconnected;
            room.current = None;
            room.advance_token += 1;
            room.queue.clear()
        };

        let cancelled = self.cancel.is_cancelled();
        for (_, entry) in std::mem::take(&mut self.pending) {
            if let PendingEnqueue::Ready { reply, .. } = entry {
                let _ = reply.send(Err(if cancelled {
                    CrescendoError::Cancelled
                } else {
                    CrescendoError::SessionClosed
                }));
            }
        }

        log::info!(
            "[RoomSession] Room {} session #{} closed ({}), dropped {} queued track(s)",
            self.room_id,
            self.generation,
            reason,
            dropped
        );
        if audio.is_some() {
            self.emit(RoomEvent::Disconnected {
                room_id: self.room_id,
                timestamp: now_millis(),
            });
        }

        if let Some(on_closed) = self.on_closed.take() {
            on_closed(self.room_id, self.generation);
        }
    }

    fn emit(&self, event: RoomEvent) {
        self.emitter.emit_room(event);
    }
}
