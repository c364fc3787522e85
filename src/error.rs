//! Unified error types for the tank supervisor.
//!
//! A single [`Error`] enum that every fallible constructor returns, keeping
//! the binary's error handling uniform.  Per-call plant and sink failures
//! keep their narrower types.  The control core itself never sees
//! these: plant failures are folded into
//! [`Reading::Unavailable`](crate::app::ports::Reading) before they reach
//! the state machine.

use core::fmt;
use std::io;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation outside the control core funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The plant could not be reached or answered with garbage.
    Transport(TransportError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The event sink could not be opened or written.
    Sink(SinkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {}", e),
            Self::Config(e) => write!(f, "config: {}", e),
            Self::Sink(e) => write!(f, "event sink: {}", e),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures talking to the remote controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// TCP connect was refused or the socket broke (carries the I/O kind).
    Io(io::ErrorKind),
    /// Connect, read or write exceeded the configured timeout.
    Timeout,
    /// No connection is open and reconnecting failed.
    NotConnected,
    /// The controller answered with a Modbus exception code.
    Exception(u8),
    /// The reply violated the protocol (bad frame, wrong transaction,
    /// short payload).
    Protocol,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error ({})", kind),
            Self::Timeout => write!(f, "timed out"),
            Self::NotConnected => write!(f, "not connected"),
            Self::Exception(code) => write!(f, "modbus exception 0x{:02x}", code),
            Self::Protocol => write!(f, "protocol violation"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            kind => Self::Io(kind),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Event sink errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SinkError {
    /// Opening, writing or rotating the log file failed.
    Io(io::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
