//! Application core: supervisor logic with no I/O of its own.
//!
//! The [`service::Supervisor`] orchestrates the level model and the
//! control state machine.  All interaction with the plant and the event
//! log happens through the **port traits** in [`ports`], keeping this layer
//! fully testable without a controller on the network.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
