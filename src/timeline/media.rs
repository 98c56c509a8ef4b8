use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;
use anyhow::Context;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Spacing of pre-decoded video frames, in seconds of clip-relative time.
pub const FRAME_SAMPLE_INTERVAL_SECS: f64 = 0.1;

/// Upper bound on the samples one [`FrameCache::sample`] call requests.
pub const MAX_SAMPLED_FRAMES: u64 = 100_000;

static NEXT_RASTER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a decoded raster; clones share it, new decodes never do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RasterId(u64);

impl RasterId {
    fn next() -> Self {
        Self(NEXT_RASTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Already-decoded pixels in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct RasterImage {
    id: RasterId,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("raster dimensions must be non-zero"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ReelError::validation("raster size overflow"))?;
        if bytes.len() != expected {
            return Err(ReelError::validation(format!(
                "raster expects {expected} bytes for {width}x{height}, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            id: RasterId::next(),
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes and wrap them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut bytes: Vec<u8>) -> ReelResult<Self> {
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_rgba8(width, height, bytes)
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) and premultiply.
    pub fn decode(bytes: &[u8]) -> ReelResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_straight_rgba8(width, height, rgba.into_raw())
    }

    /// Uniformly colored raster.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> ReelResult<Self> {
        let px = crate::foundation::core::Rgba8Premul::from(color);
        let n = (width as usize).saturating_mul(height as usize);
        let mut bytes = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            bytes.extend_from_slice(&[px.r, px.g, px.b, px.a]);
        }
        Self::from_premul_rgba8(width, height, bytes)
    }

    /// Stable identity shared by clones.
    pub fn id(&self) -> RasterId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

/// One pre-decoded video frame at a clip-relative timestamp.
#[derive(Clone, Debug)]
pub struct CachedFrame {
    /// Clip-relative time in seconds.
    pub time: f64,
    /// Decoded pixels.
    pub frame: RasterImage,
}

/// Immutable, time-ordered set of decoded frames owned by one video clip.
#[derive(Clone, Debug, Default)]
pub struct FrameCache {
    frames: Vec<CachedFrame>,
}

impl FrameCache {
    /// Build a cache from frames in any order; entries with non-finite times are dropped.
    pub fn from_frames(mut frames: Vec<CachedFrame>) -> Self {
        frames.retain(|f| f.time.is_finite());
        frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { frames }
    }

    /// Sample `provider` every `interval` seconds over `[0, duration)`.
    ///
    /// Timestamps the provider cannot decode are skipped. At least the `t = 0` sample is requested
    /// for any positive duration, and at most [`MAX_SAMPLED_FRAMES`] samples are requested.
    pub fn sample(
        duration: f64,
        interval: f64,
        mut provider: impl FnMut(f64) -> Option<RasterImage>,
    ) -> Self {
        if !duration.is_finite() || duration <= 0.0 {
            return Self::default();
        }
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            FRAME_SAMPLE_INTERVAL_SECS
        };
        let n = ((duration / interval).ceil() as u64).clamp(1, MAX_SAMPLED_FRAMES);
        let mut frames = Vec::new();
        for i in 0..n {
            let time = i as f64 * interval;
            if let Some(frame) = provider(time) {
                frames.push(CachedFrame { time, frame });
            }
        }
        Self { frames }
    }

    /// Frame whose timestamp is closest to `t`; ties resolve to the earlier frame.
    pub fn nearest(&self, t: f64) -> Option<&RasterImage> {
        if self.frames.is_empty() || !t.is_finite() {
            return self.frames.first().map(|f| &f.frame);
        }
        let idx = self.frames.partition_point(|f| f.time < t);
        let best = match (idx.checked_sub(1), self.frames.get(idx)) {
            (Some(prev), Some(next)) => {
                if (t - self.frames[prev].time) <= (next.time - t) {
                    prev
                } else {
                    idx
                }
            }
            (Some(prev), None) => prev,
            (None, _) => idx,
        };
        self.frames.get(best).map(|f| &f.frame)
    }

    /// Latest frame in the cache.
    pub fn last(&self) -> Option<&RasterImage> {
        self.frames.last().map(|f| &f.frame)
    }

    /// Cached frames in time order.
    pub fn frames(&self) -> &[CachedFrame] {
        &self.frames
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when nothing was decoded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/media.rs"]
mod tests;
