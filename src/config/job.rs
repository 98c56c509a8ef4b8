use crate::effects::EffectConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compositor::{RenderStages, RenderState};
use crate::render::text::FontBytes;
use crate::timeline::{
    CachedFrame, Caption, CaptionId, Clip, ClipId, FRAME_SAMPLE_INTERVAL_SECS, FrameCache,
    RasterImage, Timeline,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Frame rate used when a job does not name one.
pub const DEFAULT_FPS: f64 = 30.0;

fn default_fps() -> f64 {
    DEFAULT_FPS
}

fn default_interval() -> f64 {
    FRAME_SAMPLE_INTERVAL_SECS
}

/// Requested output size; unusable values fall back to 1280x720 per side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: f64::from(Canvas::DEFAULT_WIDTH),
            height: f64::from(Canvas::DEFAULT_HEIGHT),
        }
    }
}

/// Where a clip's pixels come from. Relative paths resolve against the job file's directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipSource {
    /// A single still image.
    Image {
        /// Image file.
        path: PathBuf,
    },
    /// Frames already extracted from a video, one file per sample.
    Video {
        /// Frame files in playback order.
        frames: Vec<PathBuf>,
        /// Seconds between consecutive frames.
        #[serde(default = "default_interval")]
        interval: f64,
        /// Source width before extraction; defaults to the first frame's width.
        #[serde(default)]
        natural_width: Option<u32>,
        /// Source height before extraction; defaults to the first frame's height.
        #[serde(default)]
        natural_height: Option<u32>,
    },
}

/// One clip entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    /// Pixel source.
    #[serde(flatten)]
    pub source: ClipSource,
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// Duration in seconds; images default to 2 s, videos to their frame span.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Slow pan and zoom.
    #[serde(default)]
    pub floating: bool,
}

/// One caption entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptionConfig {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds; raised to at least one second.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A complete render job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Output size.
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Timeline length in seconds.
    pub duration: f64,
    /// Overlay effect.
    #[serde(default)]
    pub effect: EffectConfig,
    /// Corner watermark text.
    #[serde(default)]
    pub watermark: String,
    /// TTF/OTF file for captions and watermark.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Stage switches.
    #[serde(default)]
    pub stages: RenderStages,
    /// Clips, any order.
    #[serde(default)]
    pub clips: Vec<ClipConfig>,
    /// Captions.
    #[serde(default)]
    pub captions: Vec<CaptionConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// A job with every referenced file decoded.
#[derive(Debug)]
pub struct LoadedJob {
    /// Output size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: f64,
    /// Clips and captions.
    pub timeline: Timeline,
    /// Overlay effect.
    pub effect: EffectConfig,
    /// Corner watermark text.
    pub watermark: String,
    /// Decoded font, if one was named.
    pub font: Option<FontBytes>,
    /// Stage switches.
    pub stages: RenderStages,
}

impl LoadedJob {
    /// Borrow everything the compositor needs.
    pub fn render_state(&self) -> RenderState<'_> {
        RenderState::new(&self.timeline)
            .with_effect(self.effect)
            .with_watermark(&self.watermark)
            .with_font(self.font.as_ref())
            .with_stages(self.stages)
    }
}

impl JobConfig {
    /// Read and validate a job file; relative media paths resolve against its directory.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        let mut job = Self::from_json_str(&text)?;
        job.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(job)
    }

    /// Parse and validate a job from JSON; relative paths resolve against the working directory.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let job: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        job.validate()?;
        Ok(job)
    }

    /// Check the numbers that cannot be clamped.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ReelError::validation(format!(
                "job duration must be finite and > 0, got {}",
                self.duration
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ReelError::validation(format!(
                "job fps must be finite and > 0, got {}",
                self.fps
            )));
        }
        for (i, clip) in self.clips.iter().enumerate() {
            if let ClipSource::Video {
                frames, interval, ..
            } = &clip.source
            {
                if frames.is_empty() {
                    return Err(ReelError::validation(format!("clip {i}: video has no frames")));
                }
                if !interval.is_finite() || *interval <= 0.0 {
                    return Err(ReelError::validation(format!(
                        "clip {i}: frame interval must be finite and > 0"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Output size after sanitizing.
    pub fn canvas(&self) -> Canvas {
        Canvas::sanitized(self.canvas.width, self.canvas.height)
    }

    /// Decode every referenced file and build the timeline.
    #[tracing::instrument(skip(self), fields(clips = self.clips.len(), captions = self.captions.len()))]
    pub fn load(&self) -> ReelResult<LoadedJob> {
        self.validate()?;
        let mut timeline = Timeline::new(self.duration)?;

        for (i, cfg) in self.clips.iter().enumerate() {
            let clip = self.load_clip(ClipId(i as u64), cfg)?;
            timeline.add_clip(clip)?;
        }
        for (i, cfg) in self.captions.iter().enumerate() {
            let mut caption = Caption::new(CaptionId(i as u64), cfg.text.clone(), cfg.start);
            if let Some(d) = cfg.duration {
                caption = caption.with_duration(d);
            }
            timeline.add_caption(caption)?;
        }

        let font = match &self.font {
            Some(p) => {
                let path = self.resolve(p);
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read font '{}'", path.display()))?;
                Some(FontBytes::new(bytes)?)
            }
            None => None,
        };

        Ok(LoadedJob {
            canvas: self.canvas(),
            fps: self.fps,
            timeline,
            effect: self.effect,
            watermark: self.watermark.clone(),
            font,
            stages: self.stages,
        })
    }

    fn load_clip(&self, id: ClipId, cfg: &ClipConfig) -> ReelResult<Clip> {
        let clip = match &cfg.source {
            ClipSource::Image { path } => {
                let img = self.decode_image(path)?;
                let clip = Clip::image(id, img);
                match cfg.duration {
                    Some(d) => clip.with_duration(d),
                    None => clip,
                }
            }
            ClipSource::Video {
                frames,
                interval,
                natural_width,
                natural_height,
            } => {
                let mut cached = Vec::with_capacity(frames.len());
                for (i, p) in frames.iter().enumerate() {
                    cached.push(CachedFrame {
                        time: i as f64 * interval,
                        frame: self.decode_image(p)?,
                    });
                }
                let (fw, fh) = cached
                    .first()
                    .map(|f| (f.frame.width(), f.frame.height()))
                    .unwrap_or((0, 0));
                let span = frames.len() as f64 * interval;
                Clip::video(
                    id,
                    FrameCache::from_frames(cached),
                    cfg.duration.unwrap_or(span),
                    natural_width.unwrap_or(fw),
                    natural_height.unwrap_or(fh),
                )
            }
        };
        Ok(clip.with_start(cfg.start).with_floating(cfg.floating))
    }

    fn decode_image(&self, rel: &Path) -> ReelResult<RasterImage> {
        let path = self.resolve(rel);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        RasterImage::decode(&bytes)
            .map_err(|e| ReelError::validation(format!("image '{}': {e}", path.display())))
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/job.rs"]
mod tests;
