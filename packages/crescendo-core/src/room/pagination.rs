//! Paginated, requester-owned view over a queue snapshot.
//!
//! A view renders a fixed snapshot; later queue mutations are not reflected.
//! Only the requester may navigate, and after an idle period the view becomes
//! permanently non-interactive. None of this touches the room session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::{Track, UserId};
use crate::constants::VIEW_FOREIGN_ACTOR_NOTICE;

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationDirection {
    Previous,
    Next,
}

/// One numbered entry on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueLine {
    /// 1-based position in the whole queue.
    pub position: usize,
    pub title: String,
}

/// A rendered page of the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePage {
    /// 0-based page index.
    pub page_index: usize,
    pub total_pages: usize,
    pub lines: Vec<QueueLine>,
    /// Whether navigation controls are still enabled.
    pub interactive: bool,
}

impl QueuePage {
    /// Header in the form `Queue — Page 2/3`.
    pub fn heading(&self) -> String {
        format!("Queue — Page {}/{}", self.page_index + 1, self.total_pages)
    }

    /// Renders the lines as `**n.** title`, one per line.
    pub fn description(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("**{}.** {}\n", line.position, line.title))
            .collect()
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// The view moved to another page.
    Moved { page: QueuePage },
    /// Already on the first/last page; nothing changed.
    AtBoundary { page: QueuePage },
    /// Someone other than the requester tried to navigate; nothing changed.
    Rejected { notice: String },
    /// The view timed out and no longer accepts navigation.
    Expired,
}

/// Paginated view over a point-in-time queue snapshot.
#[derive(Debug)]
pub struct QueuePaginationView {
    requester: UserId,
    entries: Vec<Track>,
    page_size: usize,
    current_page: usize,
    timeout: Duration,
    last_interaction: Instant,
    interactive: bool,
}

impl QueuePaginationView {
    /// Creates a view opened by `requester` over `entries`.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new(
        requester: UserId,
        entries: Vec<Track>,
        page_size: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            requester,
            entries,
            page_size: page_size.max(1),
            current_page: 0,
            timeout,
            last_interaction: Instant::now(),
            interactive: true,
        }
    }

    pub fn requester(&self) -> UserId {
        self.requester
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages; an empty snapshot still has one (empty) page.
    pub fn total_pages(&self) -> usize {
        self.entries.len().div_ceil(self.page_size).max(1)
    }

    /// Whether navigation is still accepted.
    ///
    /// Once the idle timeout elapses this turns `false` and stays there.
    pub fn is_interactive(&mut self) -> bool {
        if self.interactive && self.last_interaction.elapsed() >= self.timeout {
            self.interactive = false;
            log::debug!(
                "[QueueView] View for {} expired on page {}",
                self.requester,
                self.current_page + 1
            );
        }
        self.interactive
    }

    /// Renders the current page.
    pub fn page(&mut self) -> QueuePage {
        let interactive = self.is_interactive();
        let start = self.current_page * self.page_size;
        let lines = self
            .entries
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(idx, track)| QueueLine {
                position: idx + 1,
                title: track.title().to_string(),
            })
            .collect();

        QueuePage {
            page_index: self.current_page,
            total_pages: self.total_pages(),
            lines,
            interactive,
        }
    }

    pub fn next_page(&mut self, actor: UserId) -> NavigationOutcome {
        self.navigate(actor, NavigationDirection::Next)
    }

    pub fn previous_page(&mut self, actor: UserId) -> NavigationOutcome {
        self.navigate(actor, NavigationDirection::Previous)
    }

    /// Moves one page in `direction`, clamping at either end.
    pub fn navigate(&mut self, actor: UserId, direction: NavigationDirection) -> NavigationOutcome {
        if !self.is_interactive() {
            return NavigationOutcome::Expired;
        }
        if actor != self.requester {
            return NavigationOutcome::Rejected {
                notice: VIEW_FOREIGN_ACTOR_NOTICE.to_string(),
            };
        }

        self.last_interaction = Instant::now();

        let target = match direction {
            NavigationDirection::Previous => self.current_page.checked_sub(1),
            NavigationDirection::Next => {
                Some(self.current_page + 1).filter(|page| *page < self.total_pages())
            }
        };

        match target {
            Some(page) => {
                self.current_page = page;
                NavigationOutcome::Moved { page: self.page() }
            }
            None => NavigationOutcome::AtBoundary { page: self.page() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId(1);
    const STRANGER: UserId = UserId(2);

    fn view_of(len: usize) -> QueuePaginationView {
        let entries = (0..len)
            .map(|i| Track::new(format!("ref-{i}"), format!("Track {}", i + 1)))
            .collect();
        QueuePaginationView::new(OWNER, entries, 10, Duration::from_secs(60))
    }

    fn moved_page(outcome: NavigationOutcome) -> QueuePage {
        match outcome {
            NavigationOutcome::Moved { page } => page,
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn twenty_five_entries_paginate_as_ten_ten_five() {
        let mut view = view_of(25);
        assert_eq!(view.total_pages(), 3);

        let first = view.page();
        assert_eq!(first.lines.len(), 10);
        assert_eq!(first.lines[0].position, 1);

        let second = moved_page(view.next_page(OWNER));
        assert_eq!(second.lines.len(), 10);
        assert_eq!(second.lines[0].position, 11);

        let third = moved_page(view.next_page(OWNER));
        assert_eq!(third.lines.len(), 5);
        assert_eq!(third.lines.last().map(|l| l.position), Some(25));
    }

    #[tokio::test]
    async fn previous_on_first_page_is_a_noop() {
        let mut view = view_of(25);
        let outcome = view.previous_page(OWNER);
        assert!(matches!(
            outcome,
            NavigationOutcome::AtBoundary { ref page } if page.page_index == 0
        ));
        assert_eq!(view.current_page(), 0);
    }

    #[tokio::test]
    async fn next_on_last_page_is_a_noop() {
        let mut view = view_of(15);
        view.next_page(OWNER);
        let outcome = view.next_page(OWNER);
        assert!(matches!(outcome, NavigationOutcome::AtBoundary { .. }));
        assert_eq!(view.current_page(), 1);
    }

    #[tokio::test]
    async fn foreign_actor_cannot_navigate() {
        let mut view = view_of(25);
        let outcome = view.next_page(STRANGER);
        match outcome {
            NavigationOutcome::Rejected { notice } => assert!(notice.contains("requested")),
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert_eq!(view.current_page(), 0);
    }

    #[tokio::test]
    async fn empty_snapshot_has_single_empty_page() {
        let mut view = view_of(0);
        assert_eq!(view.total_pages(), 1);
        assert!(view.page().lines.is_empty());
        assert!(matches!(view.next_page(OWNER), NavigationOutcome::AtBoundary { .. }));
    }

    #[test]
    fn description_uses_numbered_titles() {
        let page = QueuePage {
            page_index: 1,
            total_pages: 2,
            lines: vec![QueueLine {
                position: 11,
                title: "Song".into(),
            }],
            interactive: true,
        };
        assert_eq!(page.description(), "**11.** Song\n");
        assert_eq!(page.heading(), "Queue — Page 2/2");
    }

    #[tokio::test(start_paused = true)]
    async fn view_expires_after_idle_timeout() {
        let mut view = view_of(25);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(view.is_interactive());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!view.is_interactive());
        assert_eq!(view.next_page(OWNER), NavigationOutcome::Expired);
        assert_eq!(view.current_page(), 0);
        assert!(!view.page().interactive);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_resets_idle_timer() {
        let mut view = view_of(25);

        tokio::time::advance(Duration::from_secs(45)).await;
        moved_page(view.next_page(OWNER));

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(view.is_interactive());
        moved_page(view.next_page(OWNER));
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_attempts_do_not_keep_view_alive() {
        let mut view = view_of(25);

        tokio::time::advance(Duration::from_secs(50)).await;
        view.next_page(STRANGER);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!view.is_interactive());
    }
}
