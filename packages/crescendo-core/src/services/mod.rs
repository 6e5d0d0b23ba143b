//! Application services layer.
//!
//! This module contains the services that sit between the API layer and the
//! per-room sessions in `room/`.

pub mod jukebox;
pub mod room_registry;
pub mod view_store;

pub use jukebox::{Jukebox, PlayRequest};
pub use room_registry::RoomRegistry;
pub use view_store::{OpenedQueueView, QueueViewStore};
