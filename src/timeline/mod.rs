//! Clips, captions and the rules for picking what is on screen at a given time.

pub(crate) mod media;
pub(crate) mod model;
pub(crate) mod resolve;

pub use media::{
    CachedFrame, FRAME_SAMPLE_INTERVAL_SECS, FrameCache, MAX_SAMPLED_FRAMES, RasterId, RasterImage,
};
pub use model::{
    Caption, CaptionId, Clip, ClipId, ClipKind, ClipMedia, DEFAULT_IMAGE_CLIP_SECS,
    MIN_CAPTION_SECS, Timeline,
};
pub use resolve::{Backdrop, ResolvedClips, resolve_active_clip, resolve_layers};
