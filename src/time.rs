//! Fixed-step production clock using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta, and browsers throttle
//! background tabs. `ProductionClock` turns measured wall-clock time into
//! whole 100ms production steps so cookies tick up ten times a second, while
//! every millisecond that actually elapsed is eventually credited.

pub struct ProductionClock {
    /// Milliseconds per step (e.g. 100ms = 10 steps/sec)
    ms_per_step: f64,
    /// Accumulated milliseconds not yet released as steps
    accumulator: f64,
    /// Timestamp of the last update (ms), None until the first frame
    last_timestamp: Option<f64>,
}

impl ProductionClock {
    /// `steps_per_sec`: how many production steps per real-time second (e.g. 10).
    pub fn new(steps_per_sec: u32) -> Self {
        Self {
            ms_per_step: 1000.0 / steps_per_sec as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// A clock that measures from `now_ms` instead of waiting for a first frame.
    pub fn starting_at(steps_per_sec: u32, now_ms: f64) -> Self {
        let mut clock = Self::new(steps_per_sec);
        clock.last_timestamp = Some(now_ms);
        clock
    }

    /// Feed a wall-clock timestamp. Returns the number of whole steps elapsed.
    ///
    /// Long gaps are not clamped: a tab that was throttled for a minute gets
    /// the full minute back. Timestamps that go backwards count as zero.
    pub fn update(&mut self, now_ms: f64) -> u64 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let steps = (self.accumulator / self.ms_per_step).floor() as u64;
        self.accumulator -= steps as f64 * self.ms_per_step;
        steps
    }

    /// Real-time seconds covered by one step.
    pub fn seconds_per_step(&self) -> f64 {
        self.ms_per_step / 1000.0
    }
}
