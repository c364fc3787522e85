//! Fixed-period scan loop.
//!
//! ```text
//!   ┌─▶ scan_cycle ──▶ sleep (slices of ≤ SLEEP_SLICE) ─┐
//!   └──────────── shutdown not requested ◀──────────────┘
//!                          │ requested
//!                          ▼
//!               SUPERVISOR_STOP, flush sink
//! ```
//!
//! One cycle at a time on the calling thread.  A cycle is never
//! interrupted; the shutdown flag is only checked between cycles and while
//! sleeping.  Cycles are scheduled from their start time, so a slow cycle
//! shortens the following sleep instead of drifting the period.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::app::ports::{EventSink, PlantGateway};
use crate::app::service::Supervisor;
use crate::shutdown::ShutdownSignal;

/// Longest uninterrupted sleep between shutdown checks.
pub const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Run until `shutdown` is requested, then emit `SUPERVISOR_STOP`.
///
/// Returns the number of cycles executed.
pub fn run(
    supervisor: &mut Supervisor,
    gw: &mut impl PlantGateway,
    sink: &mut impl EventSink,
    period: Duration,
    shutdown: &ShutdownSignal,
) -> u64 {
    info!("Scan loop: period {} ms", period.as_millis());
    let mut cycles = 0u64;

    while !shutdown.is_requested() {
        let started = Instant::now();
        supervisor.scan_cycle(started, gw, sink);
        cycles += 1;

        let deadline = started + period;
        if Instant::now() > deadline {
            debug!("Scan loop: cycle {} overran the period", cycles);
        }
        sleep_until(deadline, shutdown);
    }

    supervisor.stop(sink, "shutdown requested");
    cycles
}

fn sleep_until(deadline: Instant, shutdown: &ShutdownSignal) {
    loop {
        if shutdown.is_requested() {
            return;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        thread::sleep(remaining.min(SLEEP_SLICE));
    }
}
