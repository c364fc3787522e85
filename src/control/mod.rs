//! Pump control law.

pub mod hysteresis;

pub use hysteresis::{
    Action, ControlStateMachine, CycleInputs, PumpMode, SafetyLogPolicy, Thresholds,
};
