use crate::effects::EffectConfig;
use crate::foundation::core::{Affine, Canvas, Point, Rgba8, Vec2};
use crate::foundation::error::ReelResult;
use crate::render::backend::FrameRGBA;
use crate::render::caption::{CAPTION_SIZE_FRACTION, active_caption, place_caption};
use crate::render::cpu::{CpuBackend, CpuPainter};
use crate::render::plan::DrawList;
use crate::render::text::FontBytes;
use crate::timeline::{Clip, ClipMedia, RasterImage, Timeline, resolve_layers};
use std::f64::consts::TAU;

/// Opacity of the backdrop drawn under an active video clip.
pub const BACKDROP_OPACITY: f64 = 0.5;

const WATERMARK_SIZE_FRACTION: f64 = 0.025;
const WATERMARK_MARGIN_FRACTION: f64 = 0.02;
const MIN_TEXT_PX: f64 = 10.0;

const FLOAT_PERIOD_SECS: f64 = 8.0;
const FLOAT_BASE_ZOOM: f64 = 1.08;
const FLOAT_ZOOM_SWING: f64 = 0.04;
const FLOAT_PAN_FRACTION: f64 = 0.03;

/// The only input that varies between frames: video time and output size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSample {
    /// Video time in seconds, finite and `>= 0`.
    pub time: f64,
    /// Output raster size.
    pub canvas: Canvas,
}

impl RenderSample {
    /// Build a sample from untrusted numbers.
    ///
    /// Non-finite or negative time becomes `0`; unusable dimensions fall back per
    /// [`Canvas::sanitized`].
    pub fn new(time: f64, width: f64, height: f64) -> Self {
        Self::at(time, Canvas::sanitized(width, height))
    }

    /// Sample at `time` on `canvas`; unusable sides fall back per [`Canvas::sanitize`].
    pub fn at(time: f64, canvas: Canvas) -> Self {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        Self {
            time,
            canvas: canvas.sanitize(),
        }
    }
}

/// Per-stage switches; everything is enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStages {
    /// Draw the active clip and its backdrop.
    pub clip: bool,
    /// Draw the effect overlay.
    pub effect: bool,
    /// Draw the active caption.
    pub caption: bool,
    /// Draw the watermark.
    pub watermark: bool,
}

impl Default for RenderStages {
    fn default() -> Self {
        Self {
            clip: true,
            effect: true,
            caption: true,
            watermark: true,
        }
    }
}

/// Everything a frame depends on apart from the sample itself.
#[derive(Clone, Copy, Debug)]
pub struct RenderState<'a> {
    /// Clips and captions.
    pub timeline: &'a Timeline,
    /// Overlay effect.
    pub effect: EffectConfig,
    /// Corner watermark; empty disables it.
    pub watermark: &'a str,
    /// Font for captions and watermark; text stages are skipped without one.
    pub font: Option<&'a FontBytes>,
    /// Stage switches.
    pub stages: RenderStages,
}

impl<'a> RenderState<'a> {
    /// State with no effect, no watermark, no font and all stages on.
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            effect: EffectConfig::default(),
            watermark: "",
            font: None,
            stages: RenderStages::default(),
        }
    }

    /// Replace the effect.
    pub fn with_effect(mut self, effect: EffectConfig) -> Self {
        self.effect = effect;
        self
    }

    /// Replace the watermark text.
    pub fn with_watermark(mut self, watermark: &'a str) -> Self {
        self.watermark = watermark;
        self
    }

    /// Replace the font.
    pub fn with_font(mut self, font: Option<&'a FontBytes>) -> Self {
        self.font = font;
        self
    }

    /// Replace the stage switches.
    pub fn with_stages(mut self, stages: RenderStages) -> Self {
        self.stages = stages;
        self
    }
}

/// Layers clip, effect, caption and watermark into one raster per sample.
///
/// Owns the raster backend and its caches; rendering the same sample with the same state always
/// yields the same pixels.
pub struct Compositor {
    backend: CpuBackend,
    effect_list: DrawList,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Create a compositor with empty caches.
    pub fn new() -> Self {
        Self {
            backend: CpuBackend::new(),
            effect_list: DrawList::new(Canvas::default()),
        }
    }

    /// Render one frame.
    ///
    /// Stage failures are logged and the stage is skipped; the frame is still produced.
    #[tracing::instrument(skip(self, state), fields(time = sample.time))]
    pub fn render_frame(
        &mut self,
        sample: &RenderSample,
        state: &RenderState<'_>,
    ) -> ReelResult<FrameRGBA> {
        let canvas = sample.canvas;
        let t = sample.time;

        let wants_text = state.stages.caption || state.stages.watermark;
        let font = if wants_text { state.font } else { None };
        let text_ready = match self.backend.use_font(font) {
            Ok(()) => font.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "font unavailable, text stages skipped");
                let _ = self.backend.use_font(None);
                false
            }
        };

        if self.effect_list.canvas() == canvas {
            self.effect_list.clear();
        } else {
            self.effect_list = DrawList::new(canvas);
        }
        if state.stages.effect {
            state.effect.draw_into(t, &mut self.effect_list);
        }

        let effect_list = &self.effect_list;
        self.backend.render(canvas, |p| {
            p.fill(canvas.rect(), Rgba8::BLACK);

            if state.stages.clip {
                if let Err(e) = draw_clip_layer(p, canvas, t, state.timeline) {
                    tracing::warn!(error = %e, "clip stage skipped");
                }
            }
            if state.stages.effect {
                if let Err(e) = p.draw_list(effect_list) {
                    tracing::warn!(error = %e, kind = ?state.effect.kind, "effect stage skipped");
                }
            }
            if text_ready && state.stages.caption && !state.timeline.captions().is_empty() {
                if let Err(e) = draw_caption(p, canvas, t, state.timeline) {
                    tracing::warn!(error = %e, "caption stage skipped");
                }
            }
            if text_ready && state.stages.watermark && !state.watermark.is_empty() {
                if let Err(e) = draw_watermark(p, canvas, state.watermark) {
                    tracing::warn!(error = %e, "watermark stage skipped");
                }
            }
        })
    }
}

fn draw_clip_layer(
    p: &mut CpuPainter<'_>,
    canvas: Canvas,
    t: f64,
    timeline: &Timeline,
) -> ReelResult<()> {
    let Some(layers) = resolve_layers(timeline.clips(), t) else {
        return Ok(());
    };

    if let Some(backdrop) = layers.backdrop {
        let tr = clip_transform(backdrop.clip, backdrop.frame, canvas, None);
        p.draw_image(backdrop.frame, tr, BACKDROP_OPACITY)?;
    }

    let active = layers.active;
    let local = (t - active.start()).max(0.0);
    let frame = match active.media() {
        ClipMedia::Image(img) => Some(img),
        ClipMedia::Video(cache) => cache.nearest(local),
    };
    let Some(frame) = frame else {
        tracing::debug!(clip = active.id().0, local, "no decoded frame, leaving black");
        return Ok(());
    };
    let float_time = active.floating.then_some(local);
    p.draw_image(frame, clip_transform(active, frame, canvas, float_time), 1.0)
}

/// Map raster pixels so the clip covers the canvas, optionally with slow pan and zoom.
///
/// Scale is computed from the clip's natural size so low-resolution cached frames cover the same
/// area as the source would.
fn clip_transform(clip: &Clip, frame: &RasterImage, canvas: Canvas, float_time: Option<f64>) -> Affine {
    let (nw, nh) = match clip.natural_size() {
        (w, h) if w > 0 && h > 0 => (f64::from(w), f64::from(h)),
        _ => (f64::from(frame.width()), f64::from(frame.height())),
    };
    let cover = (canvas.w() / nw).max(canvas.h() / nh);
    let sx = cover * nw / f64::from(frame.width());
    let sy = cover * nh / f64::from(frame.height());

    let (zoom, pan) = match float_time {
        None => (1.0, Vec2::ZERO),
        Some(local) => {
            let phase = TAU * local / FLOAT_PERIOD_SECS;
            let zoom = FLOAT_BASE_ZOOM + FLOAT_ZOOM_SWING * (0.5 + 0.5 * phase.sin());
            let pan = Vec2::new(
                FLOAT_PAN_FRACTION * canvas.w() * (phase * 0.7).sin(),
                FLOAT_PAN_FRACTION * canvas.h() * (phase * 0.5).cos(),
            );
            (zoom, pan)
        }
    };

    Affine::translate(canvas.center().to_vec2() + pan)
        * Affine::scale_non_uniform(sx * zoom, sy * zoom)
        * Affine::translate(Vec2::new(
            -f64::from(frame.width()) * 0.5,
            -f64::from(frame.height()) * 0.5,
        ))
}

fn draw_caption(p: &mut CpuPainter<'_>, canvas: Canvas, t: f64, timeline: &Timeline) -> ReelResult<()> {
    let Some(caption) = active_caption(timeline.captions(), t) else {
        return Ok(());
    };
    let size = (canvas.h() * CAPTION_SIZE_FRACTION).max(MIN_TEXT_PX);
    let layout = p.layout_text(&caption.text, size, Rgba8::WHITE)?;
    let Some(place) = place_caption(caption, t, canvas, layout.width(), layout.height()) else {
        return Ok(());
    };
    p.draw_text(&layout, Point::new(place.x, place.y), place.alpha)
}

fn draw_watermark(p: &mut CpuPainter<'_>, canvas: Canvas, text: &str) -> ReelResult<()> {
    let size = (canvas.h() * WATERMARK_SIZE_FRACTION).max(MIN_TEXT_PX);
    let layout = p.layout_text(text, size, Rgba8::WHITE.with_alpha(0.6))?;
    let margin = canvas.w().min(canvas.h()) * WATERMARK_MARGIN_FRACTION;
    let origin = Point::new(
        canvas.w() - margin - layout.width(),
        canvas.h() - margin - layout.height(),
    );
    p.draw_text(&layout, origin, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
