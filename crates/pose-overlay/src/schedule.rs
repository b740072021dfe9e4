//! Pacing of the frame loop.

use std::{
    thread,
    time::{Duration, Instant},
};

/// Decides when the next frame loop cycle may start.
pub trait Scheduler {
    /// Blocks until the next cycle should run.
    fn wait_for_refresh(&mut self);
}

/// Paces cycles to a fixed display refresh rate.
///
/// A cycle that overruns its slot is followed immediately by the next one, and the schedule
/// restarts from that point. Missed refreshes are never made up for.
#[derive(Debug)]
pub struct RefreshClock {
    interval: Duration,
    deadline: Option<Instant>,
}

impl RefreshClock {
    /// Creates a clock ticking `fps` times per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is zero.
    pub fn new(fps: u32) -> Self {
        assert!(fps > 0, "refresh rate must be non-zero");
        Self {
            interval: Duration::from_secs(1) / fps,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RefreshClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Scheduler for RefreshClock {
    fn wait_for_refresh(&mut self) {
        let now = Instant::now();
        let deadline = *self.deadline.get_or_insert(now + self.interval);
        if let Some(remaining) = deadline.checked_duration_since(now) {
            thread::sleep(remaining);
            self.deadline = Some(deadline + self.interval);
        } else {
            log::trace!("frame took {:?} too long", now - deadline);
            self.deadline = Some(now + self.interval);
        }
    }
}

/// Runs cycles back to back without waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl Scheduler for Immediate {
    fn wait_for_refresh(&mut self) {}
}
