use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::ReelResult;
use crate::render::backend::FrameRGBA;
use crate::render::compositor::{Compositor, RenderSample, RenderState};
use crate::schedule::{Canceller, FrameScheduler, FrameTick, LoopToken, SchedulerState, TickSource};

/// What the running loop is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Interactive playback; frames go to the caller's callback.
    Preview,
    /// Recording; frames go to a sink.
    Capture,
}

/// Outcome of [`PlaybackSession::run_capture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureReport {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Frames the run would have produced.
    pub total_frames: u64,
    /// `true` when every frame was delivered.
    pub completed: bool,
}

/// One raster target driven by one scheduler.
///
/// Only one loop runs at a time: starting a capture stops a running preview first, and
/// restarting either supersedes the previous loop's token.
pub struct PlaybackSession {
    canvas: Canvas,
    scheduler: FrameScheduler,
    compositor: Compositor,
    mode: Option<PlaybackMode>,
    token: Option<LoopToken>,
    due: Vec<FrameTick>,
}

impl PlaybackSession {
    /// Idle session rendering at `canvas` size, sanitized like [`Canvas::sanitized`].
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas: canvas.sanitize(),
            scheduler: FrameScheduler::new(),
            compositor: Compositor::new(),
            mode: None,
            token: None,
            due: Vec::new(),
        }
    }

    /// Use `scheduler` (for example one with a custom catch-up limit).
    pub fn with_scheduler(mut self, scheduler: FrameScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Mode of the most recent loop, if any was started.
    pub fn mode(&self) -> Option<PlaybackMode> {
        self.mode
    }

    /// Scheduler state of the current loop.
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Handle that cancels the current loop, usable from inside frame callbacks.
    pub fn canceller(&self) -> Canceller {
        self.scheduler.canceller()
    }

    /// Start interactive playback.
    pub fn start_preview(&mut self, duration_secs: f64, fps: f64) -> ReelResult<LoopToken> {
        self.start(PlaybackMode::Preview, duration_secs, fps)
    }

    /// Start recording, stopping any preview first.
    pub fn start_capture(&mut self, duration_secs: f64, fps: f64) -> ReelResult<LoopToken> {
        if self.mode == Some(PlaybackMode::Preview) && self.state() == SchedulerState::Running {
            tracing::debug!("stopping preview before capture");
            self.stop();
        }
        self.start(PlaybackMode::Capture, duration_secs, fps)
    }

    fn start(&mut self, mode: PlaybackMode, duration_secs: f64, fps: f64) -> ReelResult<LoopToken> {
        let token = self.scheduler.start(duration_secs, fps)?;
        self.mode = Some(mode);
        self.token = Some(token);
        self.due.clear();
        Ok(token)
    }

    /// Cancel the current loop.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        self.due.clear();
    }

    /// Feed one scheduling callback at clock reading `now_secs`.
    ///
    /// Renders every frame that became due and hands it to `on_frame(progress, index, frame)`.
    /// Before each delivery the loop's token is re-checked, so a cancel issued from inside the
    /// callback stops delivery immediately. Returns the number of frames delivered.
    pub fn pump(
        &mut self,
        now_secs: f64,
        state: &RenderState<'_>,
        mut on_frame: impl FnMut(f64, FrameIndex, &FrameRGBA) -> ReelResult<()>,
    ) -> ReelResult<usize> {
        let Some(token) = self.token else {
            return Ok(0);
        };
        self.due.clear();
        self.scheduler.tick_into(token, now_secs, &mut self.due);

        let canceller = self.scheduler.canceller();
        let mut delivered = 0;
        for tick in &self.due {
            if !canceller.is_current(tick.token) {
                tracing::debug!(index = tick.index.0, "loop superseded, dropping due frames");
                break;
            }
            let sample = RenderSample::at(tick.time, self.canvas);
            let frame = self.compositor.render_frame(&sample, state)?;
            on_frame(tick.progress, tick.index, &frame)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Record the whole timeline at `fps` into `sink`, driven by `ticks`.
    ///
    /// The sink's `end` is called whether the run completes or is cancelled. A sink error cancels
    /// the run and is returned.
    #[tracing::instrument(skip(self, state, ticks, sink), fields(duration = state.timeline.duration()))]
    pub fn run_capture(
        &mut self,
        state: &RenderState<'_>,
        fps: f64,
        ticks: &mut dyn TickSource,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<CaptureReport> {
        self.start_capture(state.timeline.duration(), fps)?;
        let total_frames = self.scheduler.total_frames();
        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps,
            total_frames,
        })?;

        let mut frames = 0u64;
        while self.state() == SchedulerState::Running {
            let now = ticks.next_tick();
            let pumped = self.pump(now, state, |_, idx, frame| sink.push_frame(idx, frame));
            match pumped {
                Ok(n) => frames += n as u64,
                Err(e) => {
                    self.stop();
                    let _ = sink.end();
                    return Err(e);
                }
            }
        }
        sink.end()?;

        let completed = self.state() == SchedulerState::Completed && frames == total_frames;
        tracing::info!(frames, total_frames, completed, "capture finished");
        Ok(CaptureReport {
            frames,
            total_frames,
            completed,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/playback.rs"]
mod tests;
