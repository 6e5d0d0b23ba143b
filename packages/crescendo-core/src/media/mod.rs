//! Media collaborators: reference resolution and audio output.
//!
//! The session layer only depends on the traits in [`traits`]. Concrete
//! implementations live alongside them:
//!
//! - [`YtDlpResolver`]: resolves references by running `yt-dlp`
//! - [`SimulatedConnector`]: dry-run audio output driven by a worker thread

pub mod simulated;
pub mod traits;
pub mod ytdlp;

pub use simulated::{SimulatedConnector, SimulatedOutput};
pub use traits::{AudioConnector, AudioOutput, FinishCallback, TrackResolver};
pub use ytdlp::YtDlpResolver;
