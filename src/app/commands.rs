//! Outbound pump commands.
//!
//! The state machine decides in terms of [`Action`]s; this is the single
//! place an action becomes a call on the [`PlantGateway`].

use crate::control::Action;
use crate::error::TransportError;

use super::ports::PlantGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCommand {
    Start,
    Stop,
}

impl PumpCommand {
    pub fn for_action(action: &Action) -> Self {
        match action {
            Action::Start { .. } => Self::Start,
            Action::Stop { .. } | Action::SafetyStop { .. } => Self::Stop,
        }
    }

    /// Send the command and wait for its pulse sequence to finish.
    pub fn issue(self, gw: &mut impl PlantGateway) -> Result<(), TransportError> {
        match self {
            Self::Start => gw.pulse_start(),
            Self::Stop => gw.pulse_stop(),
        }
    }

    pub fn is_start(self) -> bool {
        self == Self::Start
    }
}
