//! Fixed-timestep clock.
//!
//! The browser calls back at whatever rate it likes (`setInterval` drifts,
//! background tabs get throttled). `GameTime` turns those wall-clock
//! timestamps into a whole number of fixed-length ticks, carrying the
//! remainder to the next call.

use crate::game::config::EngineConfig;

pub struct GameTime {
    ms_per_tick: f64,
    /// Longest gap a single frame may account for.
    max_delta_ms: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32, max_delta_ms: f64) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            max_delta_ms: max_delta_ms.max(0.0),
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.updates_per_second, config.max_frame_delta_ms)
    }

    /// Feed a timestamp (`performance.now()` on the web) and get back the
    /// number of ticks to run. The first call only records the timestamp.
    /// A gap longer than the clamp (sleeping tab) is cut down to the clamp,
    /// and a clock going backwards counts as no time.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget the last timestamp, e.g. after a long pause of the host.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }
}
