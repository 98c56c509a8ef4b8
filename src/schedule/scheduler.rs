use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Frames emitted by one [`FrameScheduler::tick`] at most, unless configured otherwise.
pub const DEFAULT_MAX_CATCH_UP: u32 = 4;

const TIME_EPSILON: f64 = 1e-9;

/// Lifecycle of a scheduler run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started.
    Idle,
    /// Emitting frames.
    Running,
    /// Cancelled before the last frame.
    Stopped,
    /// Every frame of the run was emitted.
    Completed,
}

/// Generation captured when a run starts; stale tokens are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

/// Handle that cancels the current run from anywhere, including another thread.
#[derive(Clone, Debug)]
pub struct Canceller {
    generation: Arc<AtomicU64>,
}

impl Canceller {
    /// Invalidate every token issued so far.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Return `true` while `token` belongs to the newest run.
    pub fn is_current(&self, token: LoopToken) -> bool {
        self.generation.load(Ordering::Acquire) == token.0
    }
}

/// One sample to render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Frame index within the run, starting at 0.
    pub index: FrameIndex,
    /// Exact video time: `index / fps`.
    pub time: f64,
    /// Fraction of the run finished once this frame is delivered, in `(0, 1]`.
    pub progress: f64,
    /// Run this tick belongs to.
    pub token: LoopToken,
}

/// Fixed-timestep loop state machine.
///
/// Elapsed real time is accumulated between calls to [`tick`](Self::tick); every whole frame
/// interval yields the next frame index. Indices are never repeated and never skipped: when the
/// clock runs ahead, at most `max_catch_up` frames are emitted per tick and the rest follow on
/// later ticks.
#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    generation: Arc<AtomicU64>,
    token: LoopToken,
    fps: f64,
    frame_interval: f64,
    total_frames: u64,
    next_frame: u64,
    accumulator: f64,
    last_now: Option<f64>,
    max_catch_up: u32,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Idle scheduler with [`DEFAULT_MAX_CATCH_UP`].
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            generation: Arc::new(AtomicU64::new(0)),
            token: LoopToken(0),
            fps: 0.0,
            frame_interval: 0.0,
            total_frames: 0,
            next_frame: 0,
            accumulator: 0.0,
            last_now: None,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
        }
    }

    /// Limit frames emitted per tick; values below 1 are raised to 1.
    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    /// Current state. A run cancelled through a [`Canceller`] reads as `Stopped` from the next
    /// tick on.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Frames in the current run.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Next index to be emitted.
    pub fn next_frame(&self) -> u64 {
        self.next_frame
    }

    /// Seconds per frame of the current run.
    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    /// Frames per second of the current run.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Token of the current run.
    pub fn token(&self) -> LoopToken {
        self.token
    }

    /// Handle sharing this scheduler's generation counter.
    pub fn canceller(&self) -> Canceller {
        Canceller {
            generation: Arc::clone(&self.generation),
        }
    }

    /// Begin a run of `round(duration * fps)` frames, superseding any run in progress.
    ///
    /// Fails before anything is emitted when either value is zero, negative or non-finite.
    pub fn start(&mut self, duration_secs: f64, fps: f64) -> ReelResult<LoopToken> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ReelError::validation(format!(
                "scheduler duration must be finite and > 0, got {duration_secs}"
            )));
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ReelError::validation(format!(
                "scheduler fps must be finite and > 0, got {fps}"
            )));
        }
        let total = (duration_secs * fps).round();
        if total > u64::MAX as f64 {
            return Err(ReelError::validation("scheduler frame count overflows u64"));
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.token = LoopToken(generation);
        self.fps = fps;
        self.frame_interval = 1.0 / fps;
        self.total_frames = total as u64;
        self.next_frame = 0;
        // Primed with one interval so frame 0 goes out on the first tick.
        self.accumulator = self.frame_interval;
        self.last_now = None;
        self.state = if self.total_frames == 0 {
            SchedulerState::Completed
        } else {
            SchedulerState::Running
        };
        tracing::debug!(
            duration_secs,
            fps,
            total_frames = self.total_frames,
            generation,
            "scheduler started"
        );
        Ok(self.token)
    }

    /// Stop the current run; later ticks for its token emit nothing.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Stopped;
            tracing::debug!(next_frame = self.next_frame, "scheduler cancelled");
        }
    }

    /// Advance the clock to `now_secs` and return the frames now due.
    ///
    /// `now_secs` is any monotonic clock reading; going backwards or non-finite readings count as
    /// no elapsed time. A stale `token` yields nothing.
    pub fn tick(&mut self, token: LoopToken, now_secs: f64) -> Vec<FrameTick> {
        let mut out = Vec::new();
        self.tick_into(token, now_secs, &mut out);
        out
    }

    /// Like [`tick`](Self::tick), appending into `out`.
    pub fn tick_into(&mut self, token: LoopToken, now_secs: f64, out: &mut Vec<FrameTick>) {
        if !self.is_current(token) {
            if self.state == SchedulerState::Running && token == self.token {
                self.state = SchedulerState::Stopped;
                tracing::debug!(next_frame = self.next_frame, "scheduler superseded");
            }
            return;
        }
        if self.state != SchedulerState::Running {
            return;
        }

        let elapsed = match self.last_now {
            Some(prev) if now_secs.is_finite() && now_secs > prev => now_secs - prev,
            _ => 0.0,
        };
        if now_secs.is_finite() {
            self.last_now = Some(self.last_now.map_or(now_secs, |p| p.max(now_secs)));
        }
        self.accumulator += elapsed;

        let mut emitted = 0u32;
        while emitted < self.max_catch_up
            && self.next_frame < self.total_frames
            && self.accumulator + TIME_EPSILON >= self.frame_interval
        {
            self.accumulator -= self.frame_interval;
            let index = self.next_frame;
            out.push(FrameTick {
                index: FrameIndex(index),
                time: index as f64 / self.fps,
                progress: (index + 1) as f64 / self.total_frames as f64,
                token,
            });
            self.next_frame += 1;
            emitted += 1;
        }

        // Carry at most one catch-up batch of backlog so a long stall cannot queue unbounded work.
        let max_carry = self.frame_interval * f64::from(self.max_catch_up);
        self.accumulator = self.accumulator.clamp(0.0, max_carry);

        if self.next_frame == self.total_frames {
            self.state = SchedulerState::Completed;
            self.accumulator = 0.0;
            tracing::debug!(total_frames = self.total_frames, "scheduler completed");
        }
    }

    fn is_current(&self, token: LoopToken) -> bool {
        token == self.token && self.generation.load(Ordering::Acquire) == token.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
