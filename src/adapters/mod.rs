//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                    |
//! |---------------|---------------|--------------------------------|
//! | `plant`       | PlantGateway  | Controller points via PointIo  |
//! | `time`        | DelayNs       | `std::thread::sleep`           |
//! | `log_sink`    | EventSink     | `log` facade (console)         |
//! | `file_sink`   | EventSink     | Rotating event log file        |
//! | `config_file` | ConfigPort    | JSON file on disk              |

pub mod config_file;
pub mod file_sink;
pub mod log_sink;
pub mod plant;
pub mod time;
