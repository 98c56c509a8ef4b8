use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::media::{FrameCache, RasterImage};

/// Duration given to image clips added without a usable duration.
pub const DEFAULT_IMAGE_CLIP_SECS: f64 = 2.0;
/// Shortest caption on screen, unless the whole timeline is shorter.
pub const MIN_CAPTION_SECS: f64 = 1.0;

/// Caller-assigned clip identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub u64);

/// Caller-assigned caption identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptionId(pub u64);

/// Media type of a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipKind {
    /// Still image.
    Image,
    /// Video with pre-decoded frames.
    Video,
}

/// Pixels backing a clip.
#[derive(Clone, Debug)]
pub enum ClipMedia {
    /// Still image shown for the whole clip.
    Image(RasterImage),
    /// Frames sampled from the source video.
    Video(FrameCache),
}

impl ClipMedia {
    /// Media type.
    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Image(_) => ClipKind::Image,
            Self::Video(_) => ClipKind::Video,
        }
    }
}

/// One media item placed on the timeline.
///
/// `start` and `duration` are only guaranteed to fit the timeline once the clip has been added to
/// a [`Timeline`], which clamps them.
#[derive(Clone, Debug)]
pub struct Clip {
    id: ClipId,
    media: ClipMedia,
    start: f64,
    duration: f64,
    natural_width: u32,
    natural_height: u32,
    /// Slow sinusoidal pan and zoom while on screen.
    pub floating: bool,
}

impl Clip {
    /// Image clip starting at 0 with the default duration.
    pub fn image(id: ClipId, image: RasterImage) -> Self {
        let (natural_width, natural_height) = (image.width(), image.height());
        Self {
            id,
            media: ClipMedia::Image(image),
            start: 0.0,
            duration: DEFAULT_IMAGE_CLIP_SECS,
            natural_width,
            natural_height,
            floating: false,
        }
    }

    /// Video clip; natural size is the source's, which may differ from the cached frames.
    pub fn video(
        id: ClipId,
        frames: FrameCache,
        duration: f64,
        natural_width: u32,
        natural_height: u32,
    ) -> Self {
        Self {
            id,
            media: ClipMedia::Video(frames),
            start: 0.0,
            duration,
            natural_width,
            natural_height,
            floating: false,
        }
    }

    /// Set the requested start time.
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Set the requested duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Enable or disable the floating pan and zoom.
    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    /// Clip identity.
    pub fn id(&self) -> ClipId {
        self.id
    }

    /// Backing pixels.
    pub fn media(&self) -> &ClipMedia {
        &self.media
    }

    /// Media type.
    pub fn kind(&self) -> ClipKind {
        self.media.kind()
    }

    /// Start time on the timeline, in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Time on screen, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Exclusive end time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Source size before any scaling.
    pub fn natural_size(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }

    /// Return `true` when `t` falls in `[start, start + duration)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }

    fn clamp_into(&mut self, timeline: f64) {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            self.duration = DEFAULT_IMAGE_CLIP_SECS;
        }
        self.duration = self.duration.min(timeline);
        self.start = clamp_start(self.start, self.duration, timeline);
    }
}

/// Scrolling text shown over a time window.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    id: CaptionId,
    /// Text to show; empty captions are never drawn.
    pub text: String,
    start: f64,
    duration: f64,
}

impl Caption {
    /// Caption with the minimum on-screen duration.
    pub fn new(id: CaptionId, text: impl Into<String>, start: f64) -> Self {
        Self {
            id,
            text: text.into(),
            start,
            duration: MIN_CAPTION_SECS,
        }
    }

    /// Set the requested duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Caption identity.
    pub fn id(&self) -> CaptionId {
        self.id
    }

    /// Start time, in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Time on screen, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Return `true` when `t` falls in `[start, start + duration)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.start + self.duration
    }

    fn clamp_into(&mut self, timeline: f64) {
        let d = if self.duration.is_finite() {
            self.duration
        } else {
            MIN_CAPTION_SECS
        };
        self.duration = d.max(MIN_CAPTION_SECS).min(timeline);
        self.start = clamp_start(self.start, self.duration, timeline);
    }
}

fn clamp_start(start: f64, duration: f64, timeline: f64) -> f64 {
    if !start.is_finite() {
        return 0.0;
    }
    start.clamp(0.0, (timeline - duration).max(0.0))
}

/// Total length plus ordered clips and captions.
///
/// Every mutation re-clamps the affected items so that `start >= 0` and
/// `start + duration <= duration()` always hold. Clips stay sorted by start time; equal starts keep
/// insertion order.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration: f64,
    clips: Vec<Clip>,
    captions: Vec<Caption>,
}

impl Timeline {
    /// Empty timeline of `duration` seconds.
    pub fn new(duration: f64) -> ReelResult<Self> {
        validate_duration(duration)?;
        Ok(Self {
            duration,
            clips: Vec::new(),
            captions: Vec::new(),
        })
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clips ordered by start time.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Captions in insertion order.
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    /// Look up a clip.
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Look up a caption.
    pub fn caption(&self, id: CaptionId) -> Option<&Caption> {
        self.captions.iter().find(|c| c.id == id)
    }

    /// Change the total length, re-clamping every clip and caption.
    pub fn set_duration(&mut self, duration: f64) -> ReelResult<()> {
        validate_duration(duration)?;
        self.duration = duration;
        for clip in &mut self.clips {
            clip.clamp_into(duration);
        }
        for caption in &mut self.captions {
            caption.clamp_into(duration);
        }
        self.sort_clips();
        Ok(())
    }

    /// Insert a clip, clamping it into the timeline.
    pub fn add_clip(&mut self, mut clip: Clip) -> ReelResult<ClipId> {
        if self.clip(clip.id).is_some() {
            return Err(ReelError::validation(format!(
                "clip id {} already on the timeline",
                clip.id.0
            )));
        }
        clip.clamp_into(self.duration);
        let id = clip.id;
        let at = self.clips.partition_point(|c| c.start <= clip.start);
        self.clips.insert(at, clip);
        Ok(id)
    }

    /// Remove a clip, releasing its decoded frames with it.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let idx = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(idx))
    }

    /// Move a clip; the start is clamped so the clip still fits.
    pub fn set_clip_start(&mut self, id: ClipId, start: f64) -> ReelResult<()> {
        let duration = self.duration;
        let clip = self.clip_mut(id)?;
        clip.start = start;
        clip.clamp_into(duration);
        self.sort_clips();
        Ok(())
    }

    /// Resize a clip; the duration is capped at the timeline length and the start pulled back if
    /// needed.
    pub fn set_clip_duration(&mut self, id: ClipId, duration: f64) -> ReelResult<()> {
        let total = self.duration;
        let clip = self.clip_mut(id)?;
        clip.duration = duration;
        clip.clamp_into(total);
        self.sort_clips();
        Ok(())
    }

    /// Toggle the floating pan and zoom on a clip.
    pub fn set_clip_floating(&mut self, id: ClipId, floating: bool) -> ReelResult<()> {
        self.clip_mut(id)?.floating = floating;
        Ok(())
    }

    /// Insert a caption, clamping it into the timeline.
    pub fn add_caption(&mut self, mut caption: Caption) -> ReelResult<CaptionId> {
        if self.caption(caption.id).is_some() {
            return Err(ReelError::validation(format!(
                "caption id {} already on the timeline",
                caption.id.0
            )));
        }
        caption.clamp_into(self.duration);
        let id = caption.id;
        self.captions.push(caption);
        Ok(id)
    }

    /// Retime a caption.
    pub fn set_caption_timing(&mut self, id: CaptionId, start: f64, duration: f64) -> ReelResult<()> {
        let total = self.duration;
        let caption = self
            .captions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ReelError::validation(format!("unknown caption id {}", id.0)))?;
        caption.start = start;
        caption.duration = duration;
        caption.clamp_into(total);
        Ok(())
    }

    /// Replace a caption's text.
    pub fn set_caption_text(&mut self, id: CaptionId, text: impl Into<String>) -> ReelResult<()> {
        let caption = self
            .captions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ReelError::validation(format!("unknown caption id {}", id.0)))?;
        caption.text = text.into();
        Ok(())
    }

    /// Remove a caption.
    pub fn remove_caption(&mut self, id: CaptionId) -> Option<Caption> {
        let idx = self.captions.iter().position(|c| c.id == id)?;
        Some(self.captions.remove(idx))
    }

    fn clip_mut(&mut self, id: ClipId) -> ReelResult<&mut Clip> {
        self.clips
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ReelError::validation(format!("unknown clip id {}", id.0)))
    }

    fn sort_clips(&mut self) {
        self.clips.sort_by(|a, b| a.start.total_cmp(&b.start));
    }
}

fn validate_duration(duration: f64) -> ReelResult<()> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ReelError::validation(format!(
            "timeline duration must be finite and > 0, got {duration}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
