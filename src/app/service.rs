//! Supervisor service: the hexagonal core.
//!
//! [`Supervisor`] owns the control state machine and, in simulated mode,
//! the level model.  All I/O flows through port traits injected at call
//! sites, so the whole scan cycle is testable with mock adapters.
//!
//! ```text
//!                 ┌────────────────────────┐
//!  PlantGateway ◀▶│       Supervisor       │ ──▶ EventSink
//!                 │  LevelModel · Control  │
//!                 └────────────────────────┘
//! ```
//!
//! Time is passed in explicitly as an [`Instant`], never sampled inside the
//! core, so tests can replay a run cycle by cycle.

use std::time::Instant;

use log::{debug, error, info, warn};

use crate::config::{LevelSource, SupervisorConfig};
use crate::control::{Action, ControlStateMachine, CycleInputs, PumpMode};
use crate::sim::LevelModel;

use super::commands::PumpCommand;
use super::events::{EventKind, EventRecord, SimSnapshot};
use super::ports::{EventSink, PlantGateway, Reading};

// ───────────────────────────────────────────────────────────────
// CycleReport
// ───────────────────────────────────────────────────────────────

/// What one scan cycle saw and did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub level: Reading<f64>,
    pub full_alarm: Reading<bool>,
    pub pump_status: Reading<bool>,
    /// Action proposed by the state machine, if any.
    pub action: Option<Action>,
    /// Whether the action reached the plant.  A safety stop is always
    /// committed; a failed start/stop is not.
    pub committed: bool,
}

// ───────────────────────────────────────────────────────────────
// Supervisor
// ───────────────────────────────────────────────────────────────

pub struct Supervisor {
    machine: ControlStateMachine,
    /// `None` when the level comes from a real sensor.
    model: Option<LevelModel>,
    cycle_count: u64,
}

impl Supervisor {
    /// Build the core from validated configuration.
    ///
    /// `real_epoch` anchors the simulated clock.  Does **not** talk to the
    /// plant; call [`start`](Self::start) next.
    pub fn new(config: &SupervisorConfig, real_epoch: Instant) -> crate::Result<Self> {
        config.validate()?;
        let machine = ControlStateMachine::new(
            config.thresholds()?,
            PumpMode::CommandedOff,
            config.control.safety_log,
        );

        let sim = &config.simulation;
        let model = match sim.level_source {
            LevelSource::Simulated => Some(LevelModel::new(
                real_epoch,
                sim.sim_day_real_secs,
                sim.drain_profile.clone(),
                sim.fill_pct_per_sim_min,
                sim.initial_level_pct,
            )),
            LevelSource::Sensed => None,
        };

        Ok(Self {
            machine,
            model,
            cycle_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup and adopt the pump state found on the plant.
    ///
    /// A pump that is already running puts the machine straight into
    /// `CommandedOn`, so a restart never double-starts it.
    pub fn start(&mut self, gw: &mut impl PlantGateway, sink: &mut impl EventSink) {
        sink.emit(&EventRecord::now(EventKind::SupervisorStart));

        let running = match gw.read_pump_status() {
            Ok(running) => running,
            Err(e) => {
                warn!("Supervisor: pump status unreadable at startup ({}), assuming off", e);
                false
            }
        };

        self.machine.sync(PumpMode::from_running(running));
        if let Some(model) = self.model.as_mut() {
            model.set_pump_expected_running(running);
        }
        if running {
            sink.emit(&EventRecord::now(EventKind::PumpSync));
        }
        info!("Supervisor started, pump {:?}", self.machine.mode());
    }

    /// Emit the final event and flush the sink.
    pub fn stop(&mut self, sink: &mut impl EventSink, reason: &'static str) {
        sink.emit(&EventRecord::now(EventKind::SupervisorStop { reason }));
        sink.flush();
        info!("Supervisor stopped after {} cycles ({})", self.cycle_count, reason);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one scan cycle: level → plant reads → decide → command → event.
    pub fn scan_cycle(
        &mut self,
        real_now: Instant,
        gw: &mut impl PlantGateway,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycle_count += 1;

        // 1. Level, from the model or the plant
        let (level, sim) = match self.model.as_mut() {
            Some(model) => {
                let (time_of_day, lvl) = model.advance(real_now);
                if let Err(e) = gw.write_level(lvl) {
                    warn!("Supervisor: level write failed ({})", e);
                }
                (
                    Reading::Available(lvl),
                    Some(SimSnapshot {
                        time_of_day,
                        level: lvl,
                    }),
                )
            }
            None => (observe("level", gw.read_level()), None),
        };

        // 2. Discretes
        let full_alarm = observe("full alarm", gw.read_full_alarm());
        let pump_status = observe("pump status", gw.read_pump_status());
        debug!(
            "cycle {} | level={:?} full={:?} pump={:?} mode={:?}",
            self.cycle_count,
            level,
            full_alarm,
            pump_status,
            self.machine.mode()
        );

        // 3. Decide
        let action = self.machine.evaluate(CycleInputs { level, full_alarm });

        // 4. Act
        let committed = match action {
            Some(a) => self.execute(a, gw, sink, sim),
            None => false,
        };

        CycleReport {
            level,
            full_alarm,
            pump_status,
            action,
            committed,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> PumpMode {
        self.machine.mode()
    }

    /// Current model level; `None` in sensed mode.
    pub fn model_level(&self) -> Option<f64> {
        self.model.as_ref().map(LevelModel::level)
    }

    /// Scan cycles executed since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn execute(
        &mut self,
        action: Action,
        gw: &mut impl PlantGateway,
        sink: &mut impl EventSink,
        sim: Option<SimSnapshot>,
    ) -> bool {
        let command = PumpCommand::for_action(&action);
        let result = command.issue(gw);

        match action {
            Action::SafetyStop { log_event } => {
                if let Err(e) = result {
                    error!("Supervisor: safety stop write failed ({}), re-issuing next cycle", e);
                }
                self.commit(&action, false);
                if log_event {
                    sink.emit(&EventRecord::now(EventKind::SafetyHighHigh));
                }
                true
            }
            Action::Start { level } | Action::Stop { level } => {
                if let Err(e) = result {
                    warn!("Supervisor: {:?} command failed ({}), will retry", command, e);
                    return false;
                }
                self.commit(&action, command.is_start());
                let kind = if command.is_start() {
                    EventKind::PumpStart { level, sim }
                } else {
                    EventKind::PumpStop { level, sim }
                };
                sink.emit(&EventRecord::now(kind));
                true
            }
        }
    }

    fn commit(&mut self, action: &Action, running: bool) {
        self.machine.commit(action);
        if let Some(model) = self.model.as_mut() {
            model.set_pump_expected_running(running);
        }
    }
}

/// Fold a gateway result into a [`Reading`], logging the failure.
fn observe<T>(what: &str, r: Result<T, crate::error::TransportError>) -> Reading<T> {
    if let Err(e) = &r {
        warn!("Supervisor: {} unavailable ({})", what, e);
    }
    r.into()
}
