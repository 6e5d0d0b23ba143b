//! Per-room playback: tracks, queues, the session state machine and queue views.

mod pagination;
mod queue;
mod session;
mod track;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use pagination::{
    NavigationDirection, NavigationOutcome, QueueLine, QueuePage, QueuePaginationView,
};
pub use queue::Queue;
pub use session::{
    ControlCommand, ControlOutcome, EnqueueReceipt, NoOpReason, PlaybackState, RoomSession,
    RoomSnapshot, SessionDeps,
};
pub use track::Track;

/// Generates a transparent `u64` identifier newtype.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identity of an isolated playback context (one queue, one audio channel).
    RoomId
);
id_type!(
    /// Identity of a user issuing commands.
    UserId
);
id_type!(
    /// Identity of an audio channel inside a room.
    ChannelId
);
