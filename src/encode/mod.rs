//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order and are fed by
//! [`PlaybackSession::run_capture`](crate::PlaybackSession::run_capture).

/// PNG image-sequence sink.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
