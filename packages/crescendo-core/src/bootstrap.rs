//! Application bootstrap and dependency wiring.
//!
//! This module contains the composition root - the single place where all
//! services are instantiated and wired together. The resolver and audio
//! connector are passed in so the server, tests and any chat adapter can pick
//! their own implementations.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::AppState;
use crate::config::Config;
use crate::constants::VIEW_SWEEP_INTERVAL_SECS;
use crate::error::{CrescendoError, CrescendoResult};
use crate::events::{BroadcastEventBridge, EventEmitter};
use crate::media::{AudioConnector, TrackResolver};
use crate::room::SessionDeps;
use crate::runtime::{TaskSpawner, TokioSpawner};
use crate::services::{Jukebox, QueueViewStore, RoomRegistry};

/// Container for all bootstrapped services.
#[derive(Clone)]
pub struct BootstrappedServices {
    /// Command surface for every room.
    pub jukebox: Arc<Jukebox>,
    /// Event bridge for emitting events to WebSocket and optional external consumers.
    pub event_bridge: Arc<BroadcastEventBridge>,
    /// Open queue views.
    pub view_store: Arc<QueueViewStore>,
    /// Task spawner for background operations.
    pub spawner: TokioSpawner,
    /// Cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
}

impl BootstrappedServices {
    /// Builds the API state from these services.
    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.jukebox), Arc::clone(&self.event_bridge))
    }

    /// Starts the periodic sweep of expired queue views.
    pub fn start_background_tasks(&self) {
        let views = Arc::clone(&self.view_store);
        let cancel = self.cancel_token.clone();

        self.spawner.spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(VIEW_SWEEP_INTERVAL_SECS));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        views.sweep_expired();
                    }
                }
            }
            log::debug!("[Bootstrap] View sweeper stopped");
        });
    }

    /// Initiates graceful shutdown of all services.
    pub async fn shutdown(&self) {
        log::info!("[Bootstrap] Beginning graceful shutdown...");

        // Signal cancellation to all background tasks
        self.cancel_token.cancel();

        let rooms = self.jukebox.shutdown().await;
        log::info!("[Bootstrap] Left {} room(s)", rooms);

        log::info!("[Bootstrap] Shutdown complete");
    }
}

/// Bootstraps all application services with their dependencies.
///
/// Services are created in dependency order:
///
/// 1. Event bridge and cancellation token
/// 2. Room registry (depends on resolver, connector, event bridge)
/// 3. Queue view store
/// 4. Jukebox (depends on registry and view store)
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`CrescendoError::Configuration`] if `config` is invalid.
pub fn bootstrap_services(
    config: &Config,
    resolver: Arc<dyn TrackResolver>,
    connector: Arc<dyn AudioConnector>,
) -> CrescendoResult<BootstrappedServices> {
    config.validate().map_err(CrescendoError::Configuration)?;

    // Create task spawner from current runtime
    let spawner = TokioSpawner::current();

    // Create the event bridge that maps room events to broadcast transport
    let event_bridge = Arc::new(BroadcastEventBridge::new(config.event_channel_capacity));

    // Create cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let deps = SessionDeps {
        resolver,
        connector,
        emitter: Arc::clone(&event_bridge) as Arc<dyn EventEmitter>,
        auto_leave_on_empty: config.auto_leave_on_empty,
    };
    let registry = Arc::new(RoomRegistry::new(deps, spawner.clone(), config.max_rooms));
    let view_store = Arc::new(QueueViewStore::new());

    let jukebox = Arc::new(Jukebox::new(
        registry,
        Arc::clone(&view_store),
        config.clone(),
    ));

    log::info!(
        "[Bootstrap] Services ready (auto-leave: {}, max rooms: {})",
        config.auto_leave_on_empty,
        config.max_rooms
    );

    Ok(BootstrappedServices {
        jukebox,
        event_bridge,
        view_store,
        spawner,
        cancel_token,
    })
}
