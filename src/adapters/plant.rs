//! Plant adapter: maps the supervisor's gateway operations onto
//! controller points.
//!
//! | Operation          | Point                         |
//! |--------------------|-------------------------------|
//! | `read_level`       | holding register `level`      |
//! | `write_level`      | holding register `level`      |
//! | `read_full_alarm`  | coil `full`                   |
//! | `read_pump_status` | coil `pump_status`            |
//! | `pulse_start`      | coil `start` (or `run` = 1)   |
//! | `pulse_stop`       | coil `stop`  (or `run` = 0)   |
//!
//! ## Pulse sequence
//!
//! A pulse is a button press: assert, hold for the dwell, clear.  The call
//! does not return until the clear has been written, so the scan loop
//! never moves on (or exits) with a button held down.  If the clear fails
//! it is retried once before the error is reported.

use embedded_hal::delay::DelayNs;
use log::{error, warn};

use crate::app::ports::PlantGateway;
use crate::config::{ActuationMode, PlantConfig, PointMap};
use crate::error::TransportError;
use crate::modbus::PointIo;

pub struct PlantAdapter<B: PointIo, D: DelayNs> {
    bus: B,
    delay: D,
    points: PointMap,
    actuation: ActuationMode,
    dwell_ms: u32,
    level_scale: f64,
}

impl<B: PointIo, D: DelayNs> PlantAdapter<B, D> {
    pub fn new(bus: B, delay: D, config: &PlantConfig) -> Self {
        Self {
            bus,
            delay,
            points: config.points,
            actuation: config.actuation,
            dwell_ms: config.pulse_dwell_ms.min(u64::from(u32::MAX)) as u32,
            level_scale: config.level_register_scale,
        }
    }

    /// Access the underlying bus (e.g. to close the connection).
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn pulse(&mut self, coil: u16) -> Result<(), TransportError> {
        self.bus.write_coil(coil, true)?;
        self.delay.delay_ms(self.dwell_ms);
        if let Err(first) = self.bus.write_coil(coil, false) {
            warn!("Plant: clearing coil {} failed ({}), retrying", coil, first);
            self.bus.write_coil(coil, false).inspect_err(|e| {
                error!("Plant: coil {} may be stuck asserted ({})", coil, e);
            })?;
        }
        Ok(())
    }

    fn command(&mut self, start: bool) -> Result<(), TransportError> {
        match self.actuation {
            ActuationMode::Pulse => {
                let coil = if start {
                    self.points.start_coil
                } else {
                    self.points.stop_coil
                };
                self.pulse(coil)
            }
            ActuationMode::Hold => self.bus.write_coil(self.points.run_coil, start),
        }
    }
}

impl<B: PointIo, D: DelayNs> PlantGateway for PlantAdapter<B, D> {
    fn read_level(&mut self) -> Result<f64, TransportError> {
        let raw = self.bus.read_holding_register(self.points.level_register)?;
        Ok(f64::from(raw) / self.level_scale)
    }

    fn read_full_alarm(&mut self) -> Result<bool, TransportError> {
        self.bus.read_coil(self.points.full_coil)
    }

    fn read_pump_status(&mut self) -> Result<bool, TransportError> {
        self.bus.read_coil(self.points.pump_status_coil)
    }

    /// The register holds whole counts; the fraction is truncated.
    fn write_level(&mut self, level_pct: f64) -> Result<(), TransportError> {
        let raw = (level_pct * self.level_scale).clamp(0.0, f64::from(u16::MAX)) as u16;
        self.bus.write_register(self.points.level_register, raw)
    }

    fn pulse_start(&mut self) -> Result<(), TransportError> {
        self.command(true)
    }

    fn pulse_stop(&mut self) -> Result<(), TransportError> {
        self.command(false)
    }
}
