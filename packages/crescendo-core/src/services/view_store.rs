//! Storage for open queue views.
//!
//! Views are addressed by an opaque id handed to the requester. Expired views
//! keep answering (with [`NavigationOutcome::Expired`]) until the periodic
//! sweep drops them.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::room::{NavigationDirection, NavigationOutcome, QueuePage, QueuePaginationView, UserId};

/// A freshly opened view and its first page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedQueueView {
    pub view_id: Uuid,
    pub page: QueuePage,
}

#[derive(Default)]
pub struct QueueViewStore {
    views: DashMap<Uuid, Mutex<QueuePaginationView>>,
}

impl QueueViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, mut view: QueuePaginationView) -> OpenedQueueView {
        let view_id = Uuid::new_v4();
        let page = view.page();
        log::debug!(
            "[QueueView] Opened view {} for {} ({} page(s))",
            view_id,
            view.requester(),
            page.total_pages
        );
        self.views.insert(view_id, Mutex::new(view));
        OpenedQueueView { view_id, page }
    }

    /// Navigates view `view_id`, or `None` if no such view is held.
    pub fn navigate(
        &self,
        view_id: Uuid,
        actor: UserId,
        direction: NavigationDirection,
    ) -> Option<NavigationOutcome> {
        let entry = self.views.get(&view_id)?;
        let outcome = entry.lock().navigate(actor, direction);
        Some(outcome)
    }

    /// Current page of view `view_id`.
    pub fn page(&self, view_id: Uuid) -> Option<QueuePage> {
        let entry = self.views.get(&view_id)?;
        let page = entry.lock().page();
        Some(page)
    }

    /// Drops views that no longer accept navigation. Returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let before = self.views.len();
        self.views.retain(|_, view| view.get_mut().is_interactive());
        let swept = before.saturating_sub(self.views.len());
        if swept > 0 {
            log::debug!("[QueueView] Swept {} expired view(s)", swept);
        }
        swept
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
