//! Room session registry.
//!
//! Maps each room to its live [`RoomSession`]. Sessions are created lazily on
//! the first `play` and remove themselves when they tear down. A closed
//! session that is still in the map (its removal is racing with a new
//! request) is replaced rather than reused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::error::{CrescendoError, CrescendoResult};
use crate::room::{RoomId, RoomSession, SessionDeps};
use crate::runtime::TokioSpawner;

/// Concurrent map from room to session.
pub struct RoomRegistry {
    sessions: Arc<DashMap<RoomId, Arc<RoomSession>>>,
    deps: SessionDeps,
    spawner: TokioSpawner,
    /// Source of session generations, so a late close from an old session
    /// cannot evict its replacement.
    generations: AtomicU64,
    max_rooms: usize,
    /// Held while a room that has no session is admitted, so concurrent
    /// first plays cannot overshoot `max_rooms`.
    admission: Mutex<()>,
}

impl RoomRegistry {
    pub fn new(deps: SessionDeps, spawner: TokioSpawner, max_rooms: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            deps,
            spawner,
            generations: AtomicU64::new(0),
            max_rooms,
            admission: Mutex::new(()),
        }
    }

    /// Returns the room's live session, creating one if needed.
    ///
    /// Concurrent callers for the same room all receive the same session.
    /// At most `max_rooms` sessions exist at once.
    pub fn get_or_create(&self, room_id: RoomId) -> CrescendoResult<Arc<RoomSession>> {
        if let Some(session) = self.get(room_id).filter(|session| !session.is_closed()) {
            return Ok(session);
        }

        let _admission = self.admission.lock();
        // `len()` locks every shard, so it must run outside the entry lock.
        if !self.sessions.contains_key(&room_id) && self.sessions.len() >= self.max_rooms {
            log::warn!(
                "[RoomRegistry] Refusing room {}: limit of {} reached",
                room_id,
                self.max_rooms
            );
            return Err(CrescendoError::Capacity(self.max_rooms));
        }

        let session = match self.sessions.entry(room_id) {
            Entry::Occupied(entry) if !entry.get().is_closed() => Arc::clone(entry.get()),
            Entry::Occupied(mut entry) => {
                log::debug!(
                    "[RoomRegistry] Replacing closed session #{} for room {}",
                    entry.get().generation(),
                    room_id
                );
                let session = self.spawn_session(room_id);
                entry.insert(Arc::clone(&session));
                session
            }
            Entry::Vacant(entry) => {
                let session = self.spawn_session(room_id);
                entry.insert(Arc::clone(&session));
                session
            }
        };
        Ok(session)
    }

    /// Returns the room's session without creating one.
    pub fn get(&self, room_id: RoomId) -> Option<Arc<RoomSession>> {
        self.sessions
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Drops the registry's reference to the room's session.
    ///
    /// This does not disconnect anything; use [`RoomSession::leave`] for that.
    pub fn remove(&self, room_id: RoomId) -> Option<Arc<RoomSession>> {
        self.sessions.remove(&room_id).map(|(_, session)| session)
    }

    pub fn room_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    fn spawn_session(&self, room_id: RoomId) -> Arc<RoomSession> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let sessions = Arc::downgrade(&self.sessions);

        RoomSession::spawn(
            room_id,
            generation,
            self.deps.clone(),
            &self.spawner,
            Box::new(move |room_id, generation| {
                let Some(sessions) = sessions.upgrade() else {
                    return;
                };
                if sessions
                    .remove_if(&room_id, |_, session| session.generation() == generation)
                    .is_some()
                {
                    log::debug!(
                        "[RoomRegistry] Removed session #{} for room {}",
                        generation,
                        room_id
                    );
                }
            }),
        )
    }
}
