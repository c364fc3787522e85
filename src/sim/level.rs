//! Synthetic tank-level model.
//!
//! Integrates a drain term (rate chosen by simulated hour) and, while the
//! pump is believed to be running, a fill term over the *measured* real
//! time since the previous update.  The scan period is therefore only a
//! performance knob: irregular or jittery calls integrate the same way.
//!
//! The model is the sole writer of `level` and `last_real_tick`.  The
//! `pump_expected_running` belief is set by the supervisor after each
//! command; it is never read back from the plant.

use std::time::Instant;

use chrono::{NaiveTime, Timelike};

use super::clock::SimulatedClock;
use super::profile::DrainProfile;

/// Lower and upper bounds of the level, in percent.
pub const LEVEL_MIN: f64 = 0.0;
pub const LEVEL_MAX: f64 = 100.0;

pub struct LevelModel {
    clock: SimulatedClock,
    profile: DrainProfile,
    /// Pump inflow in percent per simulated minute.
    fill_pct_per_sim_min: f64,
    level: f64,
    pump_expected_running: bool,
    last_real_tick: Instant,
}

impl LevelModel {
    /// Build a model whose clock and integrator both start at `real_epoch`.
    pub fn new(
        real_epoch: Instant,
        sim_day_real_secs: f64,
        profile: DrainProfile,
        fill_pct_per_sim_min: f64,
        initial_level: f64,
    ) -> Self {
        Self {
            clock: SimulatedClock::new(real_epoch, sim_day_real_secs),
            profile,
            fill_pct_per_sim_min,
            level: initial_level.clamp(LEVEL_MIN, LEVEL_MAX),
            pump_expected_running: false,
            last_real_tick: real_epoch,
        }
    }

    /// Integrate up to `real_now` and return the simulated time of day and
    /// the new level.
    ///
    /// An instant earlier than the previous tick integrates nothing.
    pub fn advance(&mut self, real_now: Instant) -> (NaiveTime, f64) {
        let dt_real = real_now
            .saturating_duration_since(self.last_real_tick)
            .as_secs_f64();
        if real_now > self.last_real_tick {
            self.last_real_tick = real_now;
        }

        let sim_time = self.clock.time_of_day(real_now);
        let drain_rate = self
            .clock
            .per_sim_min_to_per_real_sec(self.profile.rate_for_hour(sim_time.hour()));

        let mut delta = -drain_rate * dt_real;
        if self.pump_expected_running {
            delta += self.clock.per_sim_min_to_per_real_sec(self.fill_pct_per_sim_min) * dt_real;
        }

        self.level = (self.level + delta).clamp(LEVEL_MIN, LEVEL_MAX);
        (sim_time, self.level)
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn set_pump_expected_running(&mut self, running: bool) {
        self.pump_expected_running = running;
    }

    pub fn pump_expected_running(&self) -> bool {
        self.pump_expected_running
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }
}
