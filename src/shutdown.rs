//! Graceful shutdown flag.
//!
//! SIGINT and SIGTERM only set a flag.  The scan loop polls it between
//! cycles, so a pulse in flight always completes and no coil is left
//! asserted.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use signal_hook::consts::{SIGINT, SIGTERM};

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// A flag nothing is registered on yet; trips only via [`request`](Self::request).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the flag for SIGINT and SIGTERM.
    pub fn install() -> io::Result<Self> {
        let signal = Self::new();
        for sig in [SIGINT, SIGTERM] {
            signal_hook::flag::register(sig, Arc::clone(&signal.flag))?;
        }
        info!("Shutdown: listening for SIGINT/SIGTERM");
        Ok(signal)
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
