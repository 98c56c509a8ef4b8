use crate::timeline::media::RasterImage;
use crate::timeline::model::{Clip, ClipKind, ClipMedia};

/// Earlier clip drawn underneath an active video clip.
#[derive(Clone, Copy, Debug)]
pub struct Backdrop<'a> {
    /// Clip providing the backdrop.
    pub clip: &'a Clip,
    /// Pixels to draw: the image itself, or the last cached frame of a video.
    pub frame: &'a RasterImage,
}

/// Active clip plus the optional layer drawn beneath it.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedClips<'a> {
    /// Clip on screen at the query time.
    pub active: &'a Clip,
    /// Backdrop, only resolved for video clips.
    pub backdrop: Option<Backdrop<'a>>,
}

/// Pick the clip on screen at time `t` from clips sorted by start time.
///
/// Scans from the last clip backward and returns the first whose window `[start, start + duration)`
/// contains `t`. When no window matches (gaps, float rounding at the tail, `t` past the end), the
/// last clip of the timeline is returned. Only an empty clip list yields `None`.
pub fn resolve_active_clip(clips: &[Clip], t: f64) -> Option<&Clip> {
    active_index(clips, t).map(|i| &clips[i])
}

/// Resolve the active clip and, for video clips, a backdrop from earlier in the timeline.
///
/// The nearest earlier image clip wins; otherwise the nearest earlier video clip whose cache holds
/// at least one frame contributes its last frame.
pub fn resolve_layers(clips: &[Clip], t: f64) -> Option<ResolvedClips<'_>> {
    let idx = active_index(clips, t)?;
    let active = &clips[idx];
    let backdrop = match active.kind() {
        ClipKind::Image => None,
        ClipKind::Video => backdrop_before(&clips[..idx]),
    };
    Some(ResolvedClips { active, backdrop })
}

fn active_index(clips: &[Clip], t: f64) -> Option<usize> {
    if clips.is_empty() {
        return None;
    }
    clips
        .iter()
        .rposition(|c| c.contains(t))
        .or(Some(clips.len() - 1))
}

fn backdrop_before(earlier: &[Clip]) -> Option<Backdrop<'_>> {
    let image = earlier.iter().rev().find_map(|clip| match clip.media() {
        ClipMedia::Image(frame) => Some(Backdrop { clip, frame }),
        ClipMedia::Video(_) => None,
    });
    image.or_else(|| {
        earlier.iter().rev().find_map(|clip| match clip.media() {
            ClipMedia::Video(cache) => cache.last().map(|frame| Backdrop { clip, frame }),
            ClipMedia::Image(_) => None,
        })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/resolve.rs"]
mod tests;
