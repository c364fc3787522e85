//! Supervisor configuration.
//!
//! All tunable parameters for the tank supervisor.  Defaults reproduce the
//! reference plant; any subset can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)) or
//! the command line.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::{SafetyLogPolicy, Thresholds};
use crate::sim::DrainProfile;

/// Core supervisor configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub plant: PlantConfig,
    pub control: ControlConfig,
    pub simulation: SimulationConfig,
    pub event_log: EventLogConfig,
}

/// Where the remote controller lives and how its points are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Controller IP address or host name.
    pub host: String,
    /// Modbus/TCP port.
    pub port: u16,
    /// Modbus unit identifier.
    pub unit_id: u8,
    /// Upper bound on each connect/read/write (milliseconds).
    pub io_timeout_ms: u64,
    /// How start/stop commands are expressed on the wire.
    pub actuation: ActuationMode,
    /// How long a pulse holds the button coil asserted (milliseconds).
    pub pulse_dwell_ms: u64,
    /// Raw register counts per percent of level.
    pub level_register_scale: f64,
    pub points: PointMap,
}

/// Zero-based coil and register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointMap {
    /// Pump running feedback (read).
    pub pump_status_coil: u16,
    /// Start push-button (pulse mode).
    pub start_coil: u16,
    /// Stop push-button (pulse mode).
    pub stop_coil: u16,
    /// Run command held high while the pump should run (hold mode).
    pub run_coil: u16,
    /// High-high level interlock (read).
    pub full_coil: u16,
    /// Tank level holding register.
    pub level_register: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuationMode {
    /// Momentary press on separate start/stop coils.
    #[default]
    Pulse,
    /// Level-style command on a single run coil.
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Scan loop period (milliseconds).
    pub scan_period_ms: u64,
    /// Start the pump when the level falls below this (percent).
    pub low_threshold_pct: f64,
    /// Stop the pump when the level reaches this (percent).
    pub stop_target_pct: f64,
    pub safety_log: SafetyLogPolicy,
}

/// Where the control loop gets its level from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    /// Run the day/night model and push its level to the plant.
    #[default]
    Simulated,
    /// Read the level register as a real sensor.
    Sensed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub level_source: LevelSource,
    /// Real seconds in one simulated day.
    pub sim_day_real_secs: f64,
    /// Starting model level (percent).
    pub initial_level_pct: f64,
    /// Pump inflow (percent per simulated minute).
    pub fill_pct_per_sim_min: f64,
    pub drain_profile: DrainProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLogConfig {
    pub path: PathBuf,
    /// Rotate once the active file would exceed this many bytes.
    pub max_bytes: u64,
    /// Rotated files to keep (`path.1` … `path.N`).
    pub backup_count: u32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 502,
            unit_id: 1,
            io_timeout_ms: 1_000,
            actuation: ActuationMode::Pulse,
            pulse_dwell_ms: 500,
            level_register_scale: 1.0,
            points: PointMap::default(),
        }
    }
}

impl Default for PointMap {
    fn default() -> Self {
        Self {
            pump_status_coil: 0,
            start_coil: 800,
            stop_coil: 801,
            run_coil: 803,
            full_coil: 802,
            level_register: 0,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            scan_period_ms: 2_000,
            low_threshold_pct: 60.0,
            stop_target_pct: 95.0,
            safety_log: SafetyLogPolicy::PerEdge,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            level_source: LevelSource::Simulated,
            sim_day_real_secs: 3.0 * 60.0 * 60.0, // 24 h in 3 h
            initial_level_pct: 20.0,
            fill_pct_per_sim_min: 1.0,
            drain_profile: DrainProfile::default(),
        }
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tank_events.log"),
            max_bytes: 2 * 1024 * 1024 * 1024, // 2 GiB
            backup_count: 3,
        }
    }
}

impl SupervisorConfig {
    /// Range-check every field.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.plant;
        if p.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("plant.host must not be empty"));
        }
        if p.port == 0 {
            return Err(ConfigError::ValidationFailed("plant.port must be 1–65535"));
        }
        if !(50..=30_000).contains(&p.io_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "plant.io_timeout_ms must be 50–30000",
            ));
        }
        if !(10..=10_000).contains(&p.pulse_dwell_ms) {
            return Err(ConfigError::ValidationFailed(
                "plant.pulse_dwell_ms must be 10–10000",
            ));
        }
        if !p.level_register_scale.is_finite() || p.level_register_scale <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "plant.level_register_scale must be > 0",
            ));
        }
        if p.actuation == ActuationMode::Pulse && p.points.start_coil == p.points.stop_coil {
            return Err(ConfigError::ValidationFailed(
                "plant.points.start_coil and stop_coil must differ",
            ));
        }

        let c = &self.control;
        if !(100..=60_000).contains(&c.scan_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "control.scan_period_ms must be 100–60000",
            ));
        }
        if !(0.0..=100.0).contains(&c.low_threshold_pct) {
            return Err(ConfigError::ValidationFailed(
                "control.low_threshold_pct must be 0–100",
            ));
        }
        if !(0.0..=100.0).contains(&c.stop_target_pct) {
            return Err(ConfigError::ValidationFailed(
                "control.stop_target_pct must be 0–100",
            ));
        }
        self.thresholds()?;

        let s = &self.simulation;
        if !s.sim_day_real_secs.is_finite() || s.sim_day_real_secs < 1.0 {
            return Err(ConfigError::ValidationFailed(
                "simulation.sim_day_real_secs must be >= 1",
            ));
        }
        if !(0.0..=100.0).contains(&s.initial_level_pct) {
            return Err(ConfigError::ValidationFailed(
                "simulation.initial_level_pct must be 0–100",
            ));
        }
        if !s.fill_pct_per_sim_min.is_finite() || s.fill_pct_per_sim_min < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "simulation.fill_pct_per_sim_min must be >= 0",
            ));
        }
        s.drain_profile.validate()?;

        if self.event_log.max_bytes == 0 {
            return Err(ConfigError::ValidationFailed("event_log.max_bytes must be > 0"));
        }
        Ok(())
    }

    /// The validated hysteresis band.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.control.low_threshold_pct, self.control.stop_target_pct)
    }

    pub fn scan_period(&self) -> Duration {
        Duration::from_millis(self.control.scan_period_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.plant.io_timeout_ms)
    }
}
