//! Hysteresis pump controller with a high-high safety override.
//!
//! ```text
//!                    level < low  (alarm known clear)
//!        ┌──────────────┐ ─────────────────────▶ ┌─────────────┐
//!        │ CommandedOff │                        │ CommandedOn │
//!        └──────────────┘ ◀───────────────────── └─────────────┘
//!               ▲           level ≥ stop_target          │
//!               └───────── full alarm (any state) ───────┘
//! ```
//!
//! Evaluation is split from commitment: [`ControlStateMachine::evaluate`]
//! proposes at most one [`Action`] per cycle, the supervisor executes it
//! against the plant, and only then calls [`ControlStateMachine::commit`].
//! A start/stop that could not be written is therefore retried on the
//! next cycle instead of being believed.

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, Reading};

/// The engine's belief about its own last command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpMode {
    CommandedOff,
    CommandedOn,
}

impl PumpMode {
    pub fn from_running(running: bool) -> Self {
        if running {
            Self::CommandedOn
        } else {
            Self::CommandedOff
        }
    }
}

/// Start/stop band.  `low < stop_target` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    low: f64,
    stop_target: f64,
}

impl Thresholds {
    /// Validate and build a band.  An inverted or empty band would make the
    /// pump oscillate, so it is rejected rather than corrected.
    pub fn new(low: f64, stop_target: f64) -> Result<Self, ConfigError> {
        if !low.is_finite() || !stop_target.is_finite() {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if low >= stop_target {
            return Err(ConfigError::ValidationFailed(
                "low_threshold_pct must be < stop_target_pct",
            ));
        }
        Ok(Self { low, stop_target })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn stop_target(&self) -> f64 {
        self.stop_target
    }
}

/// How often a held high-high alarm is written to the event log.
///
/// The stop command is re-issued every cycle either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLogPolicy {
    /// One `SAFETY_HIGH_HIGH` per rising edge of the alarm.
    #[default]
    PerEdge,
    /// One `SAFETY_HIGH_HIGH` for every cycle the alarm is asserted.
    PerCycle,
}

/// Plant signals for one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleInputs {
    pub level: Reading<f64>,
    pub full_alarm: Reading<bool>,
}

/// What the supervisor should do this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Stop unconditionally; `log_event` says whether this cycle writes a
    /// safety event.
    SafetyStop { log_event: bool },
    Start { level: f64 },
    Stop { level: f64 },
}

pub struct ControlStateMachine {
    thresholds: Thresholds,
    mode: PumpMode,
    safety_log: SafetyLogPolicy,
    /// Last *observed* alarm state, for edge detection.  An unavailable
    /// read leaves it untouched.
    alarm_asserted: bool,
}

impl ControlStateMachine {
    pub fn new(thresholds: Thresholds, initial: PumpMode, safety_log: SafetyLogPolicy) -> Self {
        Self {
            thresholds,
            mode: initial,
            safety_log,
            alarm_asserted: false,
        }
    }

    /// Decide this cycle's action, if any.
    ///
    /// 1. An asserted full alarm always yields `SafetyStop`.
    /// 2. Without a level reading nothing else is evaluated.
    /// 3. A start requires the alarm to be *known* clear; an unreadable
    ///    alarm fails safe.
    /// 4. A stop only needs the level.
    pub fn evaluate(&mut self, inputs: CycleInputs) -> Option<Action> {
        match inputs.full_alarm {
            Reading::Available(true) => {
                let rising = !self.alarm_asserted;
                self.alarm_asserted = true;
                let log_event = rising || self.safety_log == SafetyLogPolicy::PerCycle;
                return Some(Action::SafetyStop { log_event });
            }
            Reading::Available(false) => self.alarm_asserted = false,
            Reading::Unavailable => {}
        }

        let level = inputs.level.value()?;
        let alarm_clear = inputs.full_alarm == Reading::Available(false);

        match self.mode {
            PumpMode::CommandedOff if alarm_clear && level < self.thresholds.low => {
                Some(Action::Start { level })
            }
            PumpMode::CommandedOn if level >= self.thresholds.stop_target => {
                Some(Action::Stop { level })
            }
            _ => None,
        }
    }

    /// Record that `action` was carried out.
    pub fn commit(&mut self, action: &Action) {
        self.mode = match action {
            Action::Start { .. } => PumpMode::CommandedOn,
            Action::Stop { .. } | Action::SafetyStop { .. } => PumpMode::CommandedOff,
        };
    }

    /// Adopt the mode found on the plant at boot.
    pub fn sync(&mut self, mode: PumpMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PumpMode {
        self.mode
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}
