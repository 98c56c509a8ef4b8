//! Marquee placement for captions.

use crate::foundation::core::Canvas;
use crate::timeline::Caption;

/// Length of the linear fade at each end of a caption window, in seconds.
pub const CAPTION_FADE_SECS: f64 = 0.2;
/// Caption font size as a fraction of canvas height.
pub const CAPTION_SIZE_FRACTION: f64 = 0.05;
/// Vertical center of the caption line as a fraction of canvas height.
pub const CAPTION_CENTER_Y_FRACTION: f64 = 0.85;

/// Where and how opaque the active caption is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionPlacement {
    /// Left edge of the text, in pixels. Starts at the canvas right edge and decreases.
    pub x: f64,
    /// Top edge of the text, in pixels.
    pub y: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

/// Earliest-starting caption whose window contains `t`; ties go to the one listed first.
pub fn active_caption(captions: &[Caption], t: f64) -> Option<&Caption> {
    if !t.is_finite() {
        return None;
    }
    captions
        .iter()
        .filter(|c| c.contains(t) && !c.text.is_empty())
        .min_by(|a, b| a.start().total_cmp(&b.start()))
}

/// Position `caption` at time `t`, or `None` when `t` is outside its window.
///
/// The text travels from the right edge of the canvas until it has fully left the left edge,
/// covering `canvas width + text width` pixels over the caption's duration.
pub fn place_caption(
    caption: &Caption,
    t: f64,
    canvas: Canvas,
    text_width: f64,
    text_height: f64,
) -> Option<CaptionPlacement> {
    if !caption.contains(t) || !(caption.duration() > 0.0) {
        return None;
    }
    let elapsed = t - caption.start();
    let remaining = caption.duration() - elapsed;
    let text_width = finite_or_zero(text_width).max(0.0);
    let text_height = finite_or_zero(text_height).max(0.0);

    let travel = canvas.w() + text_width;
    let x = canvas.w() - elapsed * (travel / caption.duration());
    let y = canvas.h() * CAPTION_CENTER_Y_FRACTION - text_height * 0.5;
    let alpha = (elapsed / CAPTION_FADE_SECS)
        .min(remaining / CAPTION_FADE_SECS)
        .clamp(0.0, 1.0);

    Some(CaptionPlacement { x, y, alpha })
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
