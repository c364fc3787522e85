//! Piecewise-constant drain profile.
//!
//! Maps simulated hour-of-day to a drain rate in percent per simulated
//! minute.  Segments are stored in a fixed-capacity vector; each segment
//! covers the hours from its `start_hour` up to (not including) the next
//! segment's start, and the last segment runs to midnight.
//!
//! ```text
//!  hour  0 ─────────── 12 ─────────── 24
//!        │  0.1 %/min   │  0.2 %/min   │
//! ```

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// One segment per hour is the finest granularity that makes sense.
pub const MAX_DRAIN_SEGMENTS: usize = 24;

/// A single constant-rate stretch of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrainSegment {
    /// First simulated hour (0–23) this rate applies to.
    pub start_hour: u8,
    /// Drain rate in percent of tank per simulated minute.
    pub pct_per_sim_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrainProfile {
    segments: Vec<DrainSegment, MAX_DRAIN_SEGMENTS>,
}

impl Default for DrainProfile {
    /// Slow overnight/morning drain, fast afternoon/evening drain.
    fn default() -> Self {
        let mut segments = Vec::new();
        // Capacity is 24; two pushes cannot overflow.
        let _ = segments.push(DrainSegment {
            start_hour: 0,
            pct_per_sim_min: 0.1,
        });
        let _ = segments.push(DrainSegment {
            start_hour: 12,
            pct_per_sim_min: 0.2,
        });
        Self { segments }
    }
}

impl DrainProfile {
    /// Build a profile from `(start_hour, rate)` pairs, validating it.
    pub fn from_segments(segments: &[DrainSegment]) -> Result<Self, ConfigError> {
        let segments = Vec::from_slice(segments)
            .map_err(|_| ConfigError::ValidationFailed("drain_profile has more than 24 segments"))?;
        let profile = Self { segments };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the segment table is usable.
    ///
    /// The first segment must start at hour 0, start hours must strictly
    /// increase and stay below 24, and every rate must be finite and ≥ 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(first) = self.segments.first() else {
            return Err(ConfigError::ValidationFailed("drain_profile must not be empty"));
        };
        if first.start_hour != 0 {
            return Err(ConfigError::ValidationFailed(
                "drain_profile must start at hour 0",
            ));
        }
        for pair in self.segments.windows(2) {
            if pair[1].start_hour <= pair[0].start_hour {
                return Err(ConfigError::ValidationFailed(
                    "drain_profile start hours must strictly increase",
                ));
            }
        }
        for seg in &self.segments {
            if seg.start_hour > 23 {
                return Err(ConfigError::ValidationFailed(
                    "drain_profile start_hour must be 0–23",
                ));
            }
            if !seg.pct_per_sim_min.is_finite() || seg.pct_per_sim_min < 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "drain_profile rates must be finite and >= 0",
                ));
            }
        }
        Ok(())
    }

    /// Drain rate (percent per simulated minute) active during `hour`.
    ///
    /// Hours past 23 are folded back into the day.  An empty profile drains
    /// nothing.
    pub fn rate_for_hour(&self, hour: u32) -> f64 {
        let hour = hour % 24;
        self.segments
            .iter()
            .rev()
            .find(|seg| u32::from(seg.start_hour) <= hour)
            .map_or(0.0, |seg| seg.pct_per_sim_min)
    }

    pub fn segments(&self) -> &[DrainSegment] {
        &self.segments
    }
}
