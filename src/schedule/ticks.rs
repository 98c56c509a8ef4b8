use crate::noise::hash11;
use std::time::{Duration, Instant};

/// Source of scheduling callbacks, each carrying a monotonic clock reading in seconds.
pub trait TickSource {
    /// Wait for the next callback and return the clock reading.
    fn next_tick(&mut self) -> f64;
}

/// Wall-clock ticks: yields once per frame interval, timing taken from [`Instant`].
///
/// Sleeping only keeps the loop from spinning; frame timing always comes from the measured clock.
#[derive(Debug)]
pub struct RealtimeTicks {
    origin: Instant,
    interval: Duration,
    started: bool,
}

impl RealtimeTicks {
    /// Ticks roughly every `interval_secs`; unusable intervals fall back to 1/60 s.
    pub fn new(interval_secs: f64) -> Self {
        let interval_secs = if interval_secs.is_finite() && interval_secs > 0.0 {
            interval_secs
        } else {
            1.0 / 60.0
        };
        Self {
            origin: Instant::now(),
            interval: Duration::from_secs_f64(interval_secs),
            started: false,
        }
    }
}

impl TickSource for RealtimeTicks {
    fn next_tick(&mut self) -> f64 {
        if self.started {
            std::thread::sleep(self.interval);
        } else {
            self.started = true;
        }
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock for tests and offline export.
///
/// Each callback advances by `base_interval` scaled by a seeded jitter in
/// `[1 - jitter, 1 + jitter]`; optionally every `stall_every`-th callback adds a long stall.
#[derive(Clone, Debug)]
pub struct SimulatedTicks {
    now: f64,
    base_interval: f64,
    jitter: f64,
    seed: u64,
    seq: u64,
    stall: Option<(u64, f64)>,
}

impl SimulatedTicks {
    /// Perfectly regular callbacks.
    pub fn steady(base_interval: f64) -> Self {
        Self::jittered(base_interval, 0.0, 0)
    }

    /// Callbacks with seeded jitter; `jitter` is clamped to `[0, 1]`.
    pub fn jittered(base_interval: f64, jitter: f64, seed: u64) -> Self {
        let base_interval = if base_interval.is_finite() && base_interval > 0.0 {
            base_interval
        } else {
            1.0 / 60.0
        };
        let jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            now: 0.0,
            base_interval,
            jitter,
            seed,
            seq: 0,
            stall: None,
        }
    }

    /// Add `stall_secs` to every `every`-th callback.
    pub fn with_stalls(mut self, every: u64, stall_secs: f64) -> Self {
        self.stall = (every > 0 && stall_secs.is_finite() && stall_secs > 0.0)
            .then_some((every, stall_secs));
        self
    }
}

impl TickSource for SimulatedTicks {
    fn next_tick(&mut self) -> f64 {
        if self.seq > 0 {
            let wobble = hash11(self.seq, self.seed);
            let mut dt = self.base_interval * (1.0 + self.jitter * wobble);
            if let Some((every, secs)) = self.stall {
                if self.seq % every == 0 {
                    dt += secs;
                }
            }
            self.now += dt.max(0.0);
        }
        self.seq += 1;
        self.now
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/ticks.rs"]
mod tests;
