//! Fixed-timestep frame scheduling.
//!
//! [`FrameScheduler`] turns a free-running clock into an exact, gap-free sequence of frame
//! samples. The same scheduler drives interactive preview and final capture; only the
//! [`TickSource`] differs.

pub(crate) mod scheduler;
pub(crate) mod ticks;

pub use scheduler::{
    Canceller, DEFAULT_MAX_CATCH_UP, FrameScheduler, FrameTick, LoopToken, SchedulerState,
};
pub use ticks::{RealtimeTicks, SimulatedTicks, TickSource};
