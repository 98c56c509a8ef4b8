//! Rasterization: display lists, the CPU backend, text, captions and the frame compositor.

pub(crate) mod backend;
pub(crate) mod caption;
pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod plan;
pub(crate) mod text;

pub use backend::FrameRGBA;
pub use caption::{
    CAPTION_CENTER_Y_FRACTION, CAPTION_FADE_SECS, CAPTION_SIZE_FRACTION, CaptionPlacement,
    active_caption, place_caption,
};
pub use compositor::{BACKDROP_OPACITY, Compositor, RenderSample, RenderStages, RenderState};
pub use plan::{DrawCmd, DrawList, GradientAxis};
pub use text::FontBytes;
