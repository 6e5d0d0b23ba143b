//! End-to-end playback through the public API with the simulated output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crescendo_core::{
    bootstrap_services, BootstrappedServices, ChannelId, Config, ControlOutcome,
    NavigationDirection, NavigationOutcome, PlayRequest, ResolutionError, ResolveResult, RoomEvent,
    RoomId, SimulatedConnector, Track, TrackResolver, UserId,
};
use tokio::sync::broadcast;

/// Resolves `list:<n>` to `n` tracks and anything else to one track.
struct EchoResolver;

#[async_trait]
impl TrackResolver for EchoResolver {
    async fn resolve(&self, reference: &str) -> ResolveResult<Vec<Track>> {
        if reference == "missing" {
            return Err(ResolutionError::NotFound(reference.to_string()));
        }
        match reference.strip_prefix("list:").and_then(|n| n.parse::<usize>().ok()) {
            Some(count) => Ok((1..=count)
                .map(|n| Track::new(format!("item-{n}"), format!("Item {n}")))
                .collect()),
            None => Ok(vec![Track::new(reference, reference)]),
        }
    }

    async fn resolve_stream(&self, track: &Track) -> ResolveResult<String> {
        Ok(format!("memory://{}", track.source_ref()))
    }
}

const ROOM: RoomId = RoomId(1);
const USER: UserId = UserId(10);

fn services(track_duration: Duration) -> BootstrappedServices {
    bootstrap_services(
        &Config::default(),
        Arc::new(EchoResolver),
        Arc::new(SimulatedConnector::new(track_duration)),
    )
    .unwrap()
}

fn request(reference: &str) -> PlayRequest {
    PlayRequest {
        reference: reference.to_string(),
        requester: USER,
        channel: Some(ChannelId(3)),
    }
}

/// Collects events until `done` matches one, failing after a few seconds.
async fn collect_until(
    events: &mut broadcast::Receiver<RoomEvent>,
    done: impl Fn(&RoomEvent) -> bool,
) -> Vec<RoomEvent> {
    let mut seen = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            let finished = done(&event);
            seen.push(event);
            if finished {
                break;
            }
        }
    })
    .await
    .expect("timed out waiting for room events");
    seen
}

fn now_playing(events: &[RoomEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            RoomEvent::NowPlaying { title, .. } => Some(title.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn queue_plays_through_and_room_is_released() {
    let services = services(Duration::from_millis(200));
    let mut events = services.event_bridge.subscribe();

    for reference in ["a", "b", "c"] {
        services.jukebox.play(ROOM, request(reference)).await.unwrap();
    }

    let seen = collect_until(&mut events, |e| matches!(e, RoomEvent::Disconnected { .. })).await;

    assert_eq!(now_playing(&seen), vec!["a", "b", "c"]);
    let exhausted = seen
        .iter()
        .filter(|e| matches!(e, RoomEvent::QueueExhausted { .. }))
        .count();
    assert_eq!(exhausted, 1);
    assert_eq!(services.jukebox.registry().room_count(), 0);
    assert!(services.jukebox.now(ROOM).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn skip_moves_to_the_next_track() {
    let services = services(Duration::from_secs(60));
    let mut events = services.event_bridge.subscribe();

    services.jukebox.play(ROOM, request("a")).await.unwrap();
    services.jukebox.play(ROOM, request("b")).await.unwrap();
    collect_until(&mut events, |e| {
        matches!(e, RoomEvent::NowPlaying { title, .. } if title == "a")
    })
    .await;

    assert_eq!(services.jukebox.skip(ROOM).await, ControlOutcome::Done);
    collect_until(&mut events, |e| {
        matches!(e, RoomEvent::NowPlaying { title, .. } if title == "b")
    })
    .await;

    assert_eq!(
        services.jukebox.now(ROOM).map(|t| t.title().to_string()).as_deref(),
        Some("b")
    );
    assert!(services.jukebox.snapshot(ROOM).queue.is_empty());

    assert_eq!(services.jukebox.leave(ROOM).await, ControlOutcome::Done);
    assert_eq!(services.jukebox.registry().room_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unresolvable_reference_changes_nothing() {
    let services = services(Duration::from_secs(60));

    services.jukebox.play(ROOM, request("a")).await.unwrap();
    let before = services.jukebox.snapshot(ROOM);

    assert!(services.jukebox.play(ROOM, request("missing")).await.is_err());
    assert_eq!(services.jukebox.snapshot(ROOM), before);

    services.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn queue_view_pages_a_long_playlist() {
    let services = services(Duration::from_secs(60));

    let receipt = services.jukebox.play(ROOM, request("list:26")).await.unwrap();
    assert_eq!(receipt.added, 26);
    assert!(receipt.starts_now);

    let opened = services.jukebox.queue(ROOM, USER).unwrap();
    assert_eq!(opened.page.heading(), "Queue — Page 1/3");
    assert!(opened.page.description().starts_with("**1.** Item 2\n"));

    let next = |actor| services.jukebox.navigate(opened.view_id, actor, NavigationDirection::Next);
    assert!(matches!(next(UserId(99)).unwrap(), NavigationOutcome::Rejected { .. }));
    assert!(matches!(next(USER).unwrap(), NavigationOutcome::Moved { .. }));
    match next(USER).unwrap() {
        NavigationOutcome::Moved { page } => assert_eq!(page.lines.len(), 5),
        other => panic!("expected Moved, got {:?}", other),
    }
    assert!(matches!(next(USER).unwrap(), NavigationOutcome::AtBoundary { .. }));

    services.shutdown().await;
}
