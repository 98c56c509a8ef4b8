use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;
use crate::encode::sink::{FrameSink, SinkConfig};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Writes every frame as `frame_000000.png`, `frame_000001.png`, ... into one directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin` if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last: None,
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path the frame `idx` is written to.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ReelError::evaluation("png sink: push_frame before begin"))?;
        if self.last.is_some_and(|last| idx <= last) {
            return Err(ReelError::evaluation(format!(
                "png sink: frame {} arrived out of order",
                idx.0
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(ReelError::evaluation(format!(
                "png sink: frame is {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        self.last = Some(idx);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence finished");
        Ok(())
    }
}

/// Encode one frame as PNG at `path`.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> ReelResult<()> {
    let straight;
    let data = if frame.premultiplied {
        straight = unpremultiply(&frame.data);
        &straight
    } else {
        &frame.data
    };
    image::save_buffer_with_format(
        path,
        data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
