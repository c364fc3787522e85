//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Supervisor (domain)
//! ```
//!
//! Driven adapters (the Modbus plant, event sinks, config storage)
//! implement these traits.  The [`Supervisor`](super::service::Supervisor)
//! consumes them via generics, so the control core never touches a socket
//! or a file directly.

use core::fmt;

use crate::config::SupervisorConfig;
use crate::error::TransportError;

use super::events::EventRecord;

// ───────────────────────────────────────────────────────────────
// Reading (explicit "no value")
// ───────────────────────────────────────────────────────────────

/// A plant reading for one scan cycle.
///
/// A failed or timed-out read is `Unavailable`, never a default value:
/// treating a missing level as `0.0` would spuriously start the pump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Available(T),
    Unavailable,
}

impl<T> Reading<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<T, E> From<Result<T, E>> for Reading<T> {
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => Self::Available(v),
            Err(_) => Self::Unavailable,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Plant gateway (driven adapter: domain ↔ remote controller)
// ───────────────────────────────────────────────────────────────

/// Everything the control core needs from the plant.
///
/// Every call may block on the transport; implementations must bound each
/// call with a timeout and report expiry as [`TransportError::Timeout`].
pub trait PlantGateway {
    /// Current tank level in percent.
    fn read_level(&mut self) -> Result<f64, TransportError>;

    /// High-high ("tank full") interlock discrete.
    fn read_full_alarm(&mut self) -> Result<bool, TransportError>;

    /// Actual pump-running discrete as reported by the plant.
    fn read_pump_status(&mut self) -> Result<bool, TransportError>;

    /// Push the synthetic level (simulated-plant mode only).
    fn write_level(&mut self, level_pct: f64) -> Result<(), TransportError>;

    /// Press the start button.  Returns once the command sequence has
    /// completed (for a pulse: asserted, held for the dwell, cleared).
    fn pulse_start(&mut self) -> Result<(), TransportError>;

    /// Press the stop button.  Same completion contract as `pulse_start`.
    fn pulse_stop(&mut self) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → durable event log)
// ───────────────────────────────────────────────────────────────

/// Append-only destination for supervisor events.
///
/// Records must be written in the order they are emitted.  Sinks handle
/// their own I/O failures (log and carry on); a broken event log never
/// stops the control loop.
pub trait EventSink {
    fn emit(&mut self, record: &EventRecord);

    /// Push buffered records to durable storage.  Called at shutdown.
    fn flush(&mut self) {}
}

/// Fan out to two sinks, first `A` then `B`.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, record: &EventRecord) {
        self.0.emit(record);
        self.1.emit(record);
    }

    fn flush(&mut self) {
        self.0.flush();
        self.1.flush();
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, record: &EventRecord) {
        (**self).emit(record);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists supervisor configuration.
///
/// Implementations MUST validate before returning or persisting: invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], never
/// silently clamped.  In particular a low threshold at or above the stop
/// target must not reach the state machine.
pub trait ConfigPort {
    /// Load configuration.  Returns [`SupervisorConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> Result<SupervisorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SupervisorConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage could not be read or written.
    IoError(std::io::ErrorKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(kind) => write!(f, "I/O error ({})", kind),
        }
    }
}

impl std::error::Error for ConfigError {}
