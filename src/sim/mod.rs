//! Plant simulation: the synthetic tank level used when no independent
//! level sensor feeds the controller.
//!
//! ```text
//!  Instant ──▶ SimulatedClock ──▶ hour ──▶ DrainProfile ──▶ rate
//!                                                          │
//!  pump_expected_running ──────────────▶ LevelModel ◀──────┘
//!                                           │
//!                                           ▼
//!                                 (time of day, level %)
//! ```

pub mod clock;
pub mod level;
pub mod profile;

pub use clock::SimulatedClock;
pub use level::LevelModel;
pub use profile::{DrainProfile, DrainSegment};
