//! Accelerated simulated clock.
//!
//! Maps real elapsed time onto a compressed simulated day so the drain
//! profile can change with the simulated hour.  A whole simulated day
//! passes in `sim_day_real_secs` real seconds.
//!
//! The clock is anchored at construction and never reset; because it is
//! driven by [`Instant`], `sim_now` never goes backwards.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Simulated seconds in one simulated day.
pub const SIM_DAY_SECS: f64 = 86_400.0;

pub struct SimulatedClock {
    real_epoch: Instant,
    sim_epoch: NaiveDateTime,
    /// Simulated seconds per real second.
    acceleration: f64,
}

impl SimulatedClock {
    /// Start a clock at simulated midnight, `real_epoch` being "now".
    ///
    /// `sim_day_real_secs` must be positive; configuration validation
    /// guarantees this before the clock is built.
    pub fn new(real_epoch: Instant, sim_day_real_secs: f64) -> Self {
        Self {
            real_epoch,
            sim_epoch: sim_midnight(),
            acceleration: SIM_DAY_SECS / sim_day_real_secs,
        }
    }

    /// Simulated seconds elapsed per real second.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Simulated calendar instant corresponding to `real_now`.
    ///
    /// Instants earlier than the epoch map to the epoch itself.
    pub fn sim_now(&self, real_now: Instant) -> NaiveDateTime {
        let real_elapsed = real_now.saturating_duration_since(self.real_epoch);
        Duration::try_from_secs_f64(real_elapsed.as_secs_f64() * self.acceleration)
            .ok()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .and_then(|d| self.sim_epoch.checked_add_signed(d))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Simulated time of day at `real_now`.
    pub fn time_of_day(&self, real_now: Instant) -> NaiveTime {
        self.sim_now(real_now).time()
    }

    /// Convert a rate expressed per simulated minute into a rate per real
    /// second.
    pub fn per_sim_min_to_per_real_sec(&self, per_sim_min: f64) -> f64 {
        per_sim_min * self.acceleration / 60.0
    }
}

/// 2000-01-01 00:00:00, the fixed anchor of every simulated run.
fn sim_midnight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}
