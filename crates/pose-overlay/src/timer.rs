//! Per-stage timing of the frame loop.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use itertools::Itertools;

/// Weight of the newest measurement in the moving average.
const SMOOTHING: f32 = 0.3;

/// Measures how long a stage of the loop takes.
///
/// Measurements are smoothed with an exponential moving average. Displaying the timer with `{}`
/// prints the average and the number of measurements, then starts over.
pub struct Timer {
    name: &'static str,
    stats: Mutex<Stats>,
}

#[derive(Default)]
struct Stats {
    /// Smoothed duration in seconds.
    average: Option<f32>,
    samples: u32,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stats: Mutex::default(),
        }
    }

    /// Runs `stage` and records how long it took.
    pub fn time<T>(&self, stage: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        stage()
    }

    /// Starts a measurement that ends when the returned guard is dropped.
    pub fn start(&self) -> TimerGuard<'_> {
        TimerGuard {
            timer: self,
            started: Instant::now(),
        }
    }

    fn stats(&self) -> MutexGuard<'_, Stats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, elapsed: Duration) {
        let secs = elapsed.as_secs_f32();
        let mut stats = self.stats();
        stats.average = Some(match stats.average {
            Some(avg) => avg + SMOOTHING * (secs - avg),
            None => secs,
        });
        stats.samples += 1;
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Stats { average, samples } = std::mem::take(&mut *self.stats());
        let ms = average.unwrap_or(0.0) * 1000.0;
        write!(f, "{}: {samples}x{ms:.1}ms", self.name)
    }
}

/// Records the time since [`Timer::start`] when dropped.
pub struct TimerGuard<'a> {
    timer: &'a Timer,
    started: Instant,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.started.elapsed());
    }
}

/// Counts loop iterations and logs the rate once per second.
pub struct FpsCounter {
    name: String,
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            since: Instant::now(),
        }
    }

    /// Counts a frame. Once a second has passed, logs the frame rate followed by `extra`.
    ///
    /// `extra` is only formatted when the rate is logged, so passing [`Timer`]s resets them once
    /// per second.
    pub fn tick_with<D: fmt::Display>(&mut self, extra: impl IntoIterator<Item = D>) {
        self.frames += 1;
        if self.since.elapsed() < Duration::from_secs(1) {
            return;
        }

        let mut extra = extra.into_iter().peekable();
        if extra.peek().is_some() {
            log::debug!("{}: {} FPS ({})", self.name, self.frames, extra.format(", "));
        } else {
            log::debug!("{}: {} FPS", self.name, self.frames);
        }

        self.frames = 0;
        self.since = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_resets() {
        let timer = Timer::new("render");
        timer.time(|| ());
        drop(timer.start());

        let shown = timer.to_string();
        assert!(shown.starts_with("render: 2x"), "{shown}");
        assert!(shown.ends_with("ms"), "{shown}");
        assert_eq!(timer.to_string(), "render: 0x0.0ms");
    }

    #[test]
    fn time_returns_value() {
        let timer = Timer::new("t");
        assert_eq!(timer.time(|| 42), 42);
    }

    #[test]
    fn fps_counter_restarts_each_second() {
        let mut fps = FpsCounter::new("test");
        fps.tick_with([&Timer::new("a")]);
        assert_eq!(fps.frames, 1);

        fps.since -= Duration::from_secs(2);
        fps.tick_with(Vec::<&Timer>::new());
        assert_eq!(fps.frames, 0);
    }
}
