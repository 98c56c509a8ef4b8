//! Playback sessions tie the scheduler, the compositor and an output together.

pub(crate) mod playback;

pub use playback::{CaptureReport, PlaybackMode, PlaybackSession};
