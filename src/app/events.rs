//! Outbound supervisor events.
//!
//! The [`Supervisor`](super::service::Supervisor) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Each record renders as a
//! single line:
//!
//! ```text
//! 2000-01-01 13:05:09 INFO PUMP_START at 59.9% (sim 13:04:30 simLvl 59.9%)
//! └──── timestamp ──┘ └sev┘└── tag ──┘└──────────── detail ──────────────┘
//! ```
//!
//! Downstream tooling splits on the first two spaces for the timestamp and
//! greps for the literal tag, so both the prefix layout and the tag strings
//! are part of the contract.

use core::fmt;

use chrono::{DateTime, Local, NaiveTime};

/// Timestamp layout of the line prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the simulation was when a command fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSnapshot {
    pub time_of_day: NaiveTime,
    pub level: f64,
}

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// The supervisor connected and began scanning.
    SupervisorStart,
    /// Boot-time sync found the pump already running.
    PumpSync,
    /// A start command was issued at `level` percent.
    PumpStart {
        level: f64,
        sim: Option<SimSnapshot>,
    },
    /// A stop command was issued at `level` percent.
    PumpStop {
        level: f64,
        sim: Option<SimSnapshot>,
    },
    /// The high-high interlock forced a stop.
    SafetyHighHigh,
    /// The supervisor is shutting down.
    SupervisorStop { reason: &'static str },
}

impl EventKind {
    /// Literal tag that leads the message body.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SupervisorStart => "SUPERVISOR_START",
            Self::PumpSync => "SYNC",
            Self::PumpStart { .. } => "PUMP_START",
            Self::PumpStop { .. } => "PUMP_STOP",
            Self::SafetyHighHigh => "SAFETY_HIGH_HIGH",
            Self::SupervisorStop { .. } => "SUPERVISOR_STOP",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::SafetyHighHigh => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())?;
        match self {
            Self::SupervisorStart => Ok(()),
            Self::PumpSync => write!(f, " found pump already running on startup"),
            Self::PumpStart { level, sim } | Self::PumpStop { level, sim } => {
                write!(f, " at {:.1}%", level)?;
                if let Some(s) = sim {
                    write!(
                        f,
                        " (sim {} simLvl {:.1}%)",
                        s.time_of_day.format("%H:%M:%S"),
                        s.level
                    )?;
                }
                Ok(())
            }
            Self::SafetyHighHigh => write!(f, " Tank_Full=1 -> Pump STOP immediately"),
            Self::SupervisorStop { reason } => write!(f, " ({})", reason),
        }
    }
}

/// One line of the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub kind: EventKind,
}

impl EventRecord {
    /// Stamp `kind` with the current wall-clock time.
    pub fn now(kind: EventKind) -> Self {
        Self::at(Local::now(), kind)
    }

    pub fn at(timestamp: DateTime<Local>, kind: EventKind) -> Self {
        Self {
            timestamp,
            severity: kind.severity(),
            kind,
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity,
            self.kind
        )
    }
}
