//! Tank pump supervisor library.
//!
//! Exposes the control core and its adapters for integration testing and
//! for embedding the supervisor in other binaries.  The core (`app`,
//! `control`, `sim`) never touches a socket or a file; the plant and the
//! event log are reached only through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod modbus;
pub mod scan;
pub mod shutdown;
pub mod sim;

pub use error::{Error, Result};
