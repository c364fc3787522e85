//! Modbus/TCP access to the tank controller.
//!
//! Framing and transport come from `tokio-modbus`; this module only adds
//! the connection policy (eager connect, per-call timeout, lazy
//! reconnect) and narrows the protocol to single-point access.  The
//! [`PlantGateway`](crate::app::ports::PlantGateway) adapter is generic
//! over [`PointIo`], so tests drive it with an in-memory point table and
//! a different fieldbus requires zero changes to the adapter.

pub mod client;

pub use client::ModbusTcpClient;

use crate::error::TransportError;

/// Single-point access to a controller's coils and holding registers.
pub trait PointIo {
    fn read_coil(&mut self, addr: u16) -> Result<bool, TransportError>;

    fn read_holding_register(&mut self, addr: u16) -> Result<u16, TransportError>;

    fn write_coil(&mut self, addr: u16, value: bool) -> Result<(), TransportError>;

    fn write_register(&mut self, addr: u16, value: u16) -> Result<(), TransportError>;
}
