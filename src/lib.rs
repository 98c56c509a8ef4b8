//! Reelcraft renders frames of a timeline slideshow with procedural overlay effects.
//!
//! Every frame is a pure function of its video time: clips, captions, and effects are resolved
//! from the [`Timeline`] and the [`EffectConfig`] without any state carried between frames, so
//! scrubbing a preview and recording a capture always produce identical pixels.
//!
//! - Build a [`Timeline`] of image and video clips plus captions
//! - Render single frames with a [`Compositor`]
//! - Drive preview or capture with a [`PlaybackSession`] feeding a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod config;
pub mod effects;
pub mod encode;
pub mod noise;
pub mod render;
pub mod schedule;
pub mod session;
pub mod timeline;

pub use crate::foundation::core::{Affine, BezPath, Canvas, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::{JobConfig, LoadedJob};
pub use crate::effects::{EffectConfig, EffectKind, Intensity, IntensityScales, intensity_scales};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::noise::{noise01, noise11};
pub use crate::render::{
    Compositor, FontBytes, FrameRGBA, RenderSample, RenderStages, RenderState,
};
pub use crate::schedule::{
    Canceller, FrameScheduler, FrameTick, LoopToken, RealtimeTicks, SchedulerState,
    SimulatedTicks, TickSource,
};
pub use crate::session::{CaptureReport, PlaybackMode, PlaybackSession};
pub use crate::timeline::{
    Caption, CaptionId, Clip, ClipId, ClipKind, FrameCache, RasterImage, Timeline,
    resolve_active_clip,
};
