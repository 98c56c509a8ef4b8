//! JSON render-job descriptions consumed by the command-line tool.

pub(crate) mod job;

pub use job::{
    CanvasConfig, CaptionConfig, ClipConfig, ClipSource, DEFAULT_FPS, JobConfig, LoadedJob,
};
