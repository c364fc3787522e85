//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by mirroring every supervisor event to the
//! `log` facade, so an operator watching the console sees pump activity
//! next to the diagnostics.  Warnings (the high-high trip) go out at
//! `warn`, everything else at `info`.

use log::{info, warn};

use crate::app::events::{EventRecord, Severity};
use crate::app::ports::EventSink;

/// Adapter that logs every [`EventRecord`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, record: &EventRecord) {
        match record.severity {
            Severity::Info => info!("EVENT | {}", record.kind),
            Severity::Warning => warn!("EVENT | {}", record.kind),
        }
    }
}
