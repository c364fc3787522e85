//! Mock plant and event sink for integration tests.
//!
//! The plant records every command so tests can assert on the full
//! history; each point can be made unavailable by setting it to `None`.

use tanksup::app::events::{EventKind, EventRecord};
use tanksup::app::ports::{EventSink, PlantGateway};
use tanksup::error::TransportError;

// ── Plant call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PlantCall {
    WriteLevel(f64),
    PulseStart,
    PulseStop,
}

// ── MockPlant ─────────────────────────────────────────────────

pub struct MockPlant {
    /// Level register; `None` makes `read_level` time out.
    pub level: Option<f64>,
    pub full_alarm: Option<bool>,
    pub pump_running: Option<bool>,
    /// Start/stop writes fail while set.
    pub fail_commands: bool,
    pub fail_level_write: bool,
    pub calls: Vec<PlantCall>,
}

#[allow(dead_code)]
impl MockPlant {
    pub fn new() -> Self {
        Self {
            level: Some(50.0),
            full_alarm: Some(false),
            pump_running: Some(false),
            fail_commands: false,
            fail_level_write: false,
            calls: Vec::new(),
        }
    }

    pub fn running() -> Self {
        Self {
            pump_running: Some(true),
            ..Self::new()
        }
    }

    pub fn starts(&self) -> usize {
        self.calls.iter().filter(|c| **c == PlantCall::PulseStart).count()
    }

    pub fn stops(&self) -> usize {
        self.calls.iter().filter(|c| **c == PlantCall::PulseStop).count()
    }

    pub fn last_written_level(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            PlantCall::WriteLevel(l) => Some(*l),
            _ => None,
        })
    }
}

impl Default for MockPlant {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantGateway for MockPlant {
    fn read_level(&mut self) -> Result<f64, TransportError> {
        self.level.ok_or(TransportError::Timeout)
    }

    fn read_full_alarm(&mut self) -> Result<bool, TransportError> {
        self.full_alarm.ok_or(TransportError::Timeout)
    }

    fn read_pump_status(&mut self) -> Result<bool, TransportError> {
        self.pump_running.ok_or(TransportError::Timeout)
    }

    fn write_level(&mut self, level_pct: f64) -> Result<(), TransportError> {
        if self.fail_level_write {
            return Err(TransportError::NotConnected);
        }
        self.calls.push(PlantCall::WriteLevel(level_pct));
        self.level = Some(level_pct);
        Ok(())
    }

    fn pulse_start(&mut self) -> Result<(), TransportError> {
        self.calls.push(PlantCall::PulseStart);
        if self.fail_commands {
            return Err(TransportError::Timeout);
        }
        self.pump_running = Some(true);
        Ok(())
    }

    fn pulse_stop(&mut self) -> Result<(), TransportError> {
        self.calls.push(PlantCall::PulseStop);
        if self.fail_commands {
            return Err(TransportError::Timeout);
        }
        self.pump_running = Some(false);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub records: Vec<EventRecord>,
    pub flushes: usize,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.kind.tag()).collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.records.iter().filter(|r| r.kind.tag() == tag).count()
    }

    pub fn kinds(&self) -> Vec<&EventKind> {
        self.records.iter().map(|r| &r.kind).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, record: &EventRecord) {
        self.records.push(record.clone());
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
