//! Command surface for chat adapters and the HTTP API.
//!
//! Every user-facing command maps to one method here. Commands for a room
//! that has no session are answered without creating one; only `play` brings
//! a session into existence.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use super::room_registry::RoomRegistry;
use super::view_store::{OpenedQueueView, QueueViewStore};
use crate::config::Config;
use crate::error::{CrescendoError, CrescendoResult};
use crate::room::{
    ChannelId, ControlCommand, ControlOutcome, EnqueueReceipt, NavigationDirection,
    NavigationOutcome, QueuePaginationView, RoomId, RoomSnapshot, Track, UserId,
};

/// A session can close between lookup and enqueue; retry once on a fresh one.
const PLAY_ATTEMPTS: usize = 2;

/// A `play` command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    /// URL or search text.
    pub reference: String,
    pub requester: UserId,
    /// The requester's current audio channel, if any.
    #[serde(default)]
    pub channel: Option<ChannelId>,
}

pub struct Jukebox {
    registry: Arc<RoomRegistry>,
    views: Arc<QueueViewStore>,
    config: Config,
}

impl Jukebox {
    pub fn new(registry: Arc<RoomRegistry>, views: Arc<QueueViewStore>, config: Config) -> Self {
        Self {
            registry,
            views,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    pub fn views(&self) -> &Arc<QueueViewStore> {
        &self.views
    }

    /// Resolves `request.reference` and appends it to the room's queue,
    /// joining the requester's channel and starting playback if needed.
    pub async fn play(
        &self,
        room_id: RoomId,
        request: PlayRequest,
    ) -> CrescendoResult<EnqueueReceipt> {
        log::debug!(
            "[Jukebox] Room {} play {:?} from {}",
            room_id,
            request.reference,
            request.requester
        );

        for attempt in 1..=PLAY_ATTEMPTS {
            let session = self.registry.get_or_create(room_id)?;
            match session.enqueue(&request.reference, request.channel).await {
                Err(CrescendoError::SessionClosed) if attempt < PLAY_ATTEMPTS => {
                    log::debug!(
                        "[Jukebox] Room {} session closed under request, retrying",
                        room_id
                    );
                }
                result => return result,
            }
        }
        Err(CrescendoError::SessionClosed)
    }

    pub async fn skip(&self, room_id: RoomId) -> ControlOutcome {
        self.control(room_id, ControlCommand::Skip).await
    }

    pub async fn pause(&self, room_id: RoomId) -> ControlOutcome {
        self.control(room_id, ControlCommand::Pause).await
    }

    pub async fn resume(&self, room_id: RoomId) -> ControlOutcome {
        self.control(room_id, ControlCommand::Resume).await
    }

    pub async fn clear(&self, room_id: RoomId) -> ControlOutcome {
        self.control(room_id, ControlCommand::Clear).await
    }

    pub async fn leave(&self, room_id: RoomId) -> ControlOutcome {
        self.control(room_id, ControlCommand::Leave).await
    }

    pub async fn control(&self, room_id: RoomId, command: ControlCommand) -> ControlOutcome {
        match self.registry.get(room_id) {
            Some(session) => session.control(command).await,
            None => ControlOutcome::without_session(command),
        }
    }

    /// The room's current track.
    pub fn now(&self, room_id: RoomId) -> Option<Track> {
        self.registry
            .get(room_id)
            .and_then(|session| session.current_track())
    }

    pub fn snapshot(&self, room_id: RoomId) -> RoomSnapshot {
        self.registry
            .get(room_id)
            .map(|session| session.snapshot())
            .unwrap_or_else(RoomSnapshot::empty)
    }

    /// Opens a paginated view over the room's queue for `requester`.
    ///
    /// Returns `None` when nothing is queued.
    pub fn queue(&self, room_id: RoomId, requester: UserId) -> Option<OpenedQueueView> {
        let entries = self.snapshot(room_id).queue;
        if entries.is_empty() {
            return None;
        }
        let view = QueuePaginationView::new(
            requester,
            entries,
            self.config.page_size,
            self.config.view_timeout(),
        );
        Some(self.views.open(view))
    }

    pub fn navigate(
        &self,
        view_id: Uuid,
        actor: UserId,
        direction: NavigationDirection,
    ) -> CrescendoResult<NavigationOutcome> {
        self.views
            .navigate(view_id, actor, direction)
            .ok_or_else(|| CrescendoError::ViewNotFound(view_id.to_string()))
    }

    /// Leaves every room. Returns how many sessions were asked to leave.
    pub async fn shutdown(&self) -> usize {
        let rooms = self.registry.room_ids();
        log::info!("[Jukebox] Leaving {} room(s)", rooms.len());
        for room_id in &rooms {
            self.leave(*room_id).await;
        }
        rooms.len()
    }
}
