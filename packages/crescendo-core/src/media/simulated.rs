//! Dry-run audio output.
//!
//! [`SimulatedOutput`] "plays" each stream for a fixed duration on a
//! dedicated worker thread and then invokes the completion callback from that
//! thread, the same way a real transport reports track ends. It is used by
//! the server when no voice transport is attached, and by tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Condvar, Mutex};

use super::traits::{AudioConnector, AudioOutput, FinishCallback};
use crate::error::{ConnectError, PlaybackOpenError};
use crate::room::{ChannelId, RoomId};

/// Connector that hands out [`SimulatedOutput`]s.
#[derive(Debug, Clone)]
pub struct SimulatedConnector {
    track_duration: Duration,
}

impl SimulatedConnector {
    /// Every stream played through outputs from this connector lasts `track_duration`.
    pub fn new(track_duration: Duration) -> Self {
        Self { track_duration }
    }
}

#[async_trait]
impl AudioConnector for SimulatedConnector {
    async fn connect(
        &self,
        room: RoomId,
        channel: ChannelId,
    ) -> Result<Box<dyn AudioOutput>, ConnectError> {
        log::info!("[SimulatedOutput] Room {} joined channel {}", room, channel);
        Ok(Box::new(SimulatedOutput::new(room, channel, self.track_duration)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Playing,
    Paused,
    Stopped,
    Finished,
}

/// State shared between the output handle and one worker thread.
struct Playback {
    phase: Mutex<Phase>,
    wake: Condvar,
}

impl Playback {
    fn set(&self, from: &[Phase], to: Phase) {
        let mut phase = self.phase.lock();
        if from.contains(&*phase) {
            *phase = to;
            self.wake.notify_all();
        }
    }
}

/// Audio output that plays nothing, for a configured duration per stream.
pub struct SimulatedOutput {
    room: RoomId,
    channel: ChannelId,
    track_duration: Duration,
    current: Mutex<Option<Arc<Playback>>>,
    connected: AtomicBool,
}

impl SimulatedOutput {
    pub fn new(room: RoomId, channel: ChannelId, track_duration: Duration) -> Self {
        Self {
            room,
            channel,
            track_duration,
            current: Mutex::new(None),
            connected: AtomicBool::new(true),
        }
    }

    fn phase(&self) -> Option<Phase> {
        self.current.lock().as_ref().map(|pb| *pb.phase.lock())
    }
}

/// Worker loop: waits out the remaining duration, honouring pause/stop.
fn run_playback(playback: Arc<Playback>, duration: Duration, on_finished: FinishCallback) {
    let mut remaining = duration;
    {
        let mut phase = playback.phase.lock();
        loop {
            match *phase {
                Phase::Stopped | Phase::Finished => break,
                Phase::Paused => playback.wake.wait(&mut phase),
                Phase::Playing => {
                    let started = Instant::now();
                    playback.wake.wait_for(&mut phase, remaining);
                    remaining = remaining.saturating_sub(started.elapsed());
                    if *phase == Phase::Playing && remaining.is_zero() {
                        *phase = Phase::Finished;
                    }
                }
            }
        }
    }
    on_finished(None);
}

impl AudioOutput for SimulatedOutput {
    fn play(&self, stream: &str, on_finished: FinishCallback) -> Result<(), PlaybackOpenError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(PlaybackOpenError::NotConnected);
        }

        let playback = Arc::new(Playback {
            phase: Mutex::new(Phase::Playing),
            wake: Condvar::new(),
        });
        if let Some(previous) = self.current.lock().replace(Arc::clone(&playback)) {
            previous.set(&[Phase::Playing, Phase::Paused], Phase::Stopped);
        }

        let worker_playback = Arc::clone(&playback);
        let duration = self.track_duration;
        thread::Builder::new()
            .name(format!("simulated-output-{}", self.room))
            .spawn(move || run_playback(worker_playback, duration, on_finished))
            .map_err(|e| PlaybackOpenError::Output(e.to_string()))?;

        log::debug!(
            "[SimulatedOutput] Room {} channel {} playing {} for {:?}",
            self.room,
            self.channel,
            stream,
            duration
        );
        Ok(())
    }

    fn stop(&self) {
        if let Some(playback) = self.current.lock().as_ref() {
            playback.set(&[Phase::Playing, Phase::Paused], Phase::Stopped);
        }
    }

    fn pause(&self) {
        if let Some(playback) = self.current.lock().as_ref() {
            playback.set(&[Phase::Playing], Phase::Paused);
        }
    }

    fn resume(&self) {
        if let Some(playback) = self.current.lock().as_ref() {
            playback.set(&[Phase::Paused], Phase::Playing);
        }
    }

    fn is_playing(&self) -> bool {
        self.phase() == Some(Phase::Playing)
    }

    fn is_paused(&self) -> bool {
        self.phase() == Some(Phase::Paused)
    }

    fn disconnect(&self) {
        self.stop();
        if self.connected.swap(false, Ordering::SeqCst) {
            log::info!(
                "[SimulatedOutput] Room {} left channel {}",
                self.room,
                self.channel
            );
        }
    }
}
