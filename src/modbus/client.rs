//! Blocking Modbus/TCP client over the `tokio-modbus` sync context.
//!
//! ## Connection model
//!
//! 1. [`ModbusTcpClient::connect`] opens the socket eagerly so a bad
//!    address fails at startup.
//! 2. Every request, and every connect, is bounded by the configured
//!    timeout.
//! 3. Any transport or protocol failure drops the context; the next
//!    request reconnects.  A Modbus exception keeps the context, since the
//!    controller answered correctly.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use log::{info, warn};
use tokio_modbus::Slave;
use tokio_modbus::client::sync::{self, Context, Reader, Writer};

use crate::error::TransportError;

use super::PointIo;

pub struct ModbusTcpClient {
    addr: SocketAddr,
    unit_id: u8,
    timeout: Duration,
    ctx: Option<Context>,
}

impl ModbusTcpClient {
    /// Resolve `host:port` and open the connection.
    pub fn connect(host: &str, port: u16, unit_id: u8, timeout: Duration) -> crate::Result<Self> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(TransportError::from)?
            .next()
            .ok_or(TransportError::NotConnected)?;

        let mut client = Self {
            addr,
            unit_id,
            timeout,
            ctx: None,
        };
        client.reconnect()?;
        Ok(client)
    }

    pub fn is_connected(&self) -> bool {
        self.ctx.is_some()
    }

    /// Drop the connection.  The next request reconnects.
    pub fn close(&mut self) {
        if self.ctx.take().is_some() {
            info!("Modbus: closed connection to {}", self.addr);
        }
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        let slave = Slave(self.unit_id);
        let ctx = sync::tcp::connect_slave_with_timeout(self.addr, slave, Some(self.timeout))?;
        info!("Modbus: connected to {} (unit {})", self.addr, self.unit_id);
        self.ctx = Some(ctx);
        Ok(())
    }

    fn context(&mut self) -> Result<&mut Context, TransportError> {
        if self.ctx.is_none() {
            self.reconnect()?;
        }
        self.ctx.as_mut().ok_or(TransportError::NotConnected)
    }

    /// Fold a `tokio-modbus` result into ours, dropping the context on
    /// anything other than success or an exception reply.
    fn settle<T>(
        &mut self,
        op: &str,
        addr: u16,
        result: tokio_modbus::Result<T>,
    ) -> Result<T, TransportError> {
        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(code)) => Err(TransportError::Exception(u8::from(code))),
            Err(e) => {
                warn!("Modbus: {} {} failed ({}), dropping connection", op, addr, e);
                self.ctx = None;
                Err(match e {
                    tokio_modbus::Error::Transport(io) => TransportError::from(io),
                    _ => TransportError::Protocol,
                })
            }
        }
    }
}

impl PointIo for ModbusTcpClient {
    fn read_coil(&mut self, addr: u16) -> Result<bool, TransportError> {
        let result = self.context()?.read_coils(addr, 1);
        let bits = self.settle("read coil", addr, result)?;
        bits.first().copied().ok_or(TransportError::Protocol)
    }

    fn read_holding_register(&mut self, addr: u16) -> Result<u16, TransportError> {
        let result = self.context()?.read_holding_registers(addr, 1);
        let words = self.settle("read register", addr, result)?;
        words.first().copied().ok_or(TransportError::Protocol)
    }

    fn write_coil(&mut self, addr: u16, value: bool) -> Result<(), TransportError> {
        let result = self.context()?.write_single_coil(addr, value);
        self.settle("write coil", addr, result)
    }

    fn write_register(&mut self, addr: u16, value: u16) -> Result<(), TransportError> {
        let result = self.context()?.write_single_register(addr, value);
        self.settle("write register", addr, result)
    }
}
