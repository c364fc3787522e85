//! Tank pump supervisor: main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  PlantAdapter<ModbusTcpClient, StdDelay>   JsonConfigFile     │
//! │  (PlantGateway)                            (ConfigPort)       │
//! │  (LogEventSink, FileEventSink)             ShutdownSignal     │
//! │  (EventSink)                               (SIGINT/SIGTERM)   │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌───────────────────────────────────────────────────────┐    │
//! │  │            Supervisor (pure logic)                    │    │
//! │  │  LevelModel · ControlStateMachine                     │    │
//! │  └───────────────────────────────────────────────────────┘    │
//! │                                                               │
//! │  scan::run (fixed-period loop)                                │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tanksup::adapters::config_file::JsonConfigFile;
use tanksup::adapters::file_sink::FileEventSink;
use tanksup::adapters::log_sink::LogEventSink;
use tanksup::adapters::plant::PlantAdapter;
use tanksup::adapters::time::StdDelay;
use tanksup::app::ports::ConfigPort;
use tanksup::app::service::Supervisor;
use tanksup::config::SupervisorConfig;
use tanksup::modbus::ModbusTcpClient;
use tanksup::scan;
use tanksup::shutdown::ShutdownSignal;

// ── CLI ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tanksup")]
#[command(about = "Supervisory pump control for a tank on a Modbus/TCP controller")]
#[command(version)]
struct Cli {
    /// JSON configuration file (missing file = built-in defaults)
    #[arg(short, long, default_value = "tanksup.json")]
    config: PathBuf,

    /// Override the controller address
    #[arg(long)]
    plant_host: Option<String>,

    /// Override the controller port
    #[arg(long)]
    plant_port: Option<u16>,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_default_config: bool,
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.print_default_config {
        println!("{}", serde_json::to_string_pretty(&SupervisorConfig::default())?);
        return Ok(());
    }

    info!("tanksup v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let mut config = JsonConfigFile::new(&cli.config)
        .load()
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(host) = cli.plant_host {
        config.plant.host = host;
    }
    if let Some(port) = cli.plant_port {
        config.plant.port = port;
    }
    config.validate().context("invalid configuration")?;

    // ── 2. Event sinks ────────────────────────────────────────
    let file_sink = FileEventSink::open(&config.event_log)
        .with_context(|| format!("opening event log {}", config.event_log.path.display()))?;
    let mut sink = (LogEventSink::new(), file_sink);

    // ── 3. Plant connection (fatal if unreachable) ────────────
    let p = &config.plant;
    let client = ModbusTcpClient::connect(&p.host, p.port, p.unit_id, config.io_timeout())
        .with_context(|| format!("connecting to controller at {}:{}", p.host, p.port))?;
    let mut plant = PlantAdapter::new(client, StdDelay::new(), p);

    // ── 4. Supervisor ─────────────────────────────────────────
    let shutdown = ShutdownSignal::install().context("installing signal handlers")?;
    let mut supervisor = Supervisor::new(&config, Instant::now())?;
    supervisor.start(&mut plant, &mut sink);

    // ── 5. Scan loop ──────────────────────────────────────────
    let cycles = scan::run(
        &mut supervisor,
        &mut plant,
        &mut sink,
        config.scan_period(),
        &shutdown,
    );

    plant.bus_mut().close();
    info!("Exiting after {} scan cycles", cycles);
    Ok(())
}
