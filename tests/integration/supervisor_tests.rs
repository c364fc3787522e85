//! Integration tests for the Supervisor → state machine → plant pipeline.
//!
//! Time is injected, so every scenario replays deterministically.  Most
//! tests use a 1440 s simulated day: one simulated minute per real second,
//! which makes the default drain 0.1 %/s before noon and the fill 1 %/s.

use std::time::{Duration, Instant};

use chrono::NaiveTime;

use tanksup::app::events::EventKind;
use tanksup::app::ports::Reading;
use tanksup::app::service::Supervisor;
use tanksup::config::{LevelSource, SupervisorConfig};
use tanksup::control::{Action, PumpMode, SafetyLogPolicy};

use crate::mock_plant::{MockPlant, PlantCall, RecordingSink};

fn simulated(initial: f64) -> SupervisorConfig {
    let mut c = SupervisorConfig::default();
    c.simulation.sim_day_real_secs = 1_440.0;
    c.simulation.initial_level_pct = initial;
    c
}

fn sensed() -> SupervisorConfig {
    let mut c = SupervisorConfig::default();
    c.simulation.level_source = LevelSource::Sensed;
    c
}

fn boot(config: &SupervisorConfig, plant: &mut MockPlant) -> (Supervisor, RecordingSink, Instant) {
    let t0 = Instant::now();
    let mut sup = Supervisor::new(config, t0).unwrap();
    let mut sink = RecordingSink::new();
    sup.start(plant, &mut sink);
    (sup, sink, t0)
}

fn secs(t0: Instant, s: u64) -> Instant {
    t0 + Duration::from_secs(s)
}

// ── Scenario A: draining tank triggers exactly one start ──────

#[test]
fn scenario_a_single_start_when_level_crosses_low() {
    let mut plant = MockPlant::new();
    let (mut sup, mut sink, t0) = boot(&simulated(65.0), &mut plant);

    let mut first_start = None;
    for k in 1..=25u64 {
        sup.scan_cycle(secs(t0, 3 * k), &mut plant, &mut sink);
        if first_start.is_none() && sink.count("PUMP_START") == 1 {
            first_start = Some(k);
        }
    }

    // 65 - 0.3 k drops below 60 first at k = 17 (59.9).
    assert_eq!(first_start, Some(17));
    assert_eq!(sink.count("PUMP_START"), 1);
    assert_eq!(sink.count("PUMP_STOP"), 0);
    assert_eq!(plant.starts(), 1);

    let start = sink
        .kinds()
        .into_iter()
        .find_map(|k| match k {
            EventKind::PumpStart { level, sim } => Some((*level, *sim)),
            _ => None,
        })
        .unwrap();
    assert!((start.0 - 59.9).abs() < 1e-6, "started at {}", start.0);
    let sim = start.1.expect("simulated run carries a snapshot");
    assert_eq!(sim.time_of_day, NaiveTime::from_hms_opt(0, 51, 0).unwrap());
}

#[test]
fn scenario_a_no_events_before_crossing() {
    let mut plant = MockPlant::new();
    let (mut sup, mut sink, t0) = boot(&simulated(65.0), &mut plant);
    for k in 1..=16u64 {
        let report = sup.scan_cycle(secs(t0, 3 * k), &mut plant, &mut sink);
        assert_eq!(report.action, None);
    }
    assert_eq!(sink.tags(), vec!["SUPERVISOR_START"]);
    assert_eq!(plant.starts() + plant.stops(), 0);
}

// ── Scenario B: filling tank triggers exactly one stop ────────

#[test]
fn scenario_b_single_stop_at_target() {
    let mut plant = MockPlant::running();
    let (mut sup, mut sink, t0) = boot(&simulated(90.0), &mut plant);
    assert_eq!(sup.mode(), PumpMode::CommandedOn);

    let mut stop_cycle = None;
    for k in 1..=20u64 {
        let report = sup.scan_cycle(secs(t0, k), &mut plant, &mut sink);
        if matches!(report.action, Some(Action::Stop { .. })) {
            assert!(stop_cycle.is_none(), "second stop at cycle {}", k);
            stop_cycle = Some(k);
        }
    }

    // 90 + 0.9 k reaches 95 first at k = 6 (95.4).
    assert_eq!(stop_cycle, Some(6));
    assert_eq!(sink.count("PUMP_STOP"), 1);
    assert_eq!(sink.count("PUMP_START"), 0);
    assert_eq!(plant.stops(), 1);
    assert_eq!(sup.mode(), PumpMode::CommandedOff);
}

// ── Scenario C: safety trip beats a low level ─────────────────

#[test]
fn scenario_c_safety_trip_blocks_start() {
    let mut plant = MockPlant::running();
    plant.full_alarm = Some(true);
    let (mut sup, mut sink, t0) = boot(&simulated(40.0), &mut plant);

    let r1 = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert_eq!(r1.action, Some(Action::SafetyStop { log_event: true }));
    assert_eq!(sup.mode(), PumpMode::CommandedOff);
    assert_eq!(sink.count("SAFETY_HIGH_HIGH"), 1);

    // Alarm held: stop re-issued, still no start despite level < low.
    let r2 = sup.scan_cycle(secs(t0, 2), &mut plant, &mut sink);
    assert_eq!(r2.action, Some(Action::SafetyStop { log_event: false }));
    assert_eq!(plant.stops(), 2);
    assert_eq!(sink.count("PUMP_START"), 0);
    assert_eq!(sink.count("SAFETY_HIGH_HIGH"), 1);

    // Model believes the pump is off: level is falling again.
    let l1 = r1.level.value().unwrap();
    let l2 = r2.level.value().unwrap();
    assert!(l2 < l1);

    // Alarm clears: normal start resumes.
    plant.full_alarm = Some(false);
    let r3 = sup.scan_cycle(secs(t0, 3), &mut plant, &mut sink);
    assert!(matches!(r3.action, Some(Action::Start { .. })));
    assert_eq!(sink.count("PUMP_START"), 1);
}

#[test]
fn safety_event_is_a_warning() {
    let mut plant = MockPlant::running();
    plant.full_alarm = Some(true);
    let (mut sup, mut sink, t0) = boot(&simulated(40.0), &mut plant);
    sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    let line = sink.records.last().unwrap().to_string();
    assert!(line.contains(" WARNING SAFETY_HIGH_HIGH "), "{}", line);
}

#[test]
fn per_cycle_policy_logs_every_held_cycle() {
    let mut config = simulated(40.0);
    config.control.safety_log = SafetyLogPolicy::PerCycle;
    let mut plant = MockPlant::new();
    plant.full_alarm = Some(true);
    let (mut sup, mut sink, t0) = boot(&config, &mut plant);
    for k in 1..=3 {
        sup.scan_cycle(secs(t0, k), &mut plant, &mut sink);
    }
    assert_eq!(sink.count("SAFETY_HIGH_HIGH"), 3);
    assert_eq!(plant.stops(), 3);
}

#[test]
fn safety_stop_commits_even_if_pulse_fails() {
    let mut plant = MockPlant::running();
    plant.full_alarm = Some(true);
    plant.fail_commands = true;
    let (mut sup, mut sink, t0) = boot(&simulated(80.0), &mut plant);

    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert!(report.committed);
    assert_eq!(sup.mode(), PumpMode::CommandedOff);
    assert_eq!(sink.count("SAFETY_HIGH_HIGH"), 1);
}

// ── Startup sync ──────────────────────────────────────────────

#[test]
fn running_pump_at_boot_is_never_restarted() {
    let mut plant = MockPlant::running();
    plant.level = Some(30.0);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);

    assert_eq!(sink.tags(), vec!["SUPERVISOR_START", "SYNC"]);
    for k in 1..=10 {
        sup.scan_cycle(secs(t0, k), &mut plant, &mut sink);
    }
    assert_eq!(plant.starts(), 0);
    assert_eq!(sink.count("PUMP_START"), 0);
}

#[test]
fn synced_pump_feeds_the_model() {
    let mut plant = MockPlant::running();
    let (mut sup, mut sink, t0) = boot(&simulated(50.0), &mut plant);
    let report = sup.scan_cycle(secs(t0, 10), &mut plant, &mut sink);
    // +1.0 fill, -0.1 drain per second.
    assert!((report.level.value().unwrap() - 59.0).abs() < 1e-6);
}

#[test]
fn unreadable_status_at_boot_assumes_off() {
    let mut plant = MockPlant::new();
    plant.pump_running = None;
    plant.level = Some(30.0);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);

    assert_eq!(sink.tags(), vec!["SUPERVISOR_START"]);
    assert_eq!(sup.mode(), PumpMode::CommandedOff);

    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert_eq!(report.pump_status, Reading::Unavailable);
    assert!(matches!(report.action, Some(Action::Start { .. })));
}

// ── Boundaries ────────────────────────────────────────────────

#[test]
fn level_equal_to_low_does_not_start() {
    let mut plant = MockPlant::new();
    plant.level = Some(60.0);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);
    assert_eq!(sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink).action, None);
}

#[test]
fn level_equal_to_target_stops() {
    let mut plant = MockPlant::running();
    plant.level = Some(95.0);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);
    assert_eq!(
        sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink).action,
        Some(Action::Stop { level: 95.0 })
    );
}

// ── Unavailable readings ──────────────────────────────────────

#[test]
fn missing_level_skips_thresholds() {
    let mut plant = MockPlant::new();
    plant.level = None;
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);

    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert_eq!(report.level, Reading::Unavailable);
    assert_eq!(report.action, None);
    assert!(plant.calls.is_empty());
}

#[test]
fn missing_level_still_honours_safety() {
    let mut plant = MockPlant::running();
    plant.level = None;
    plant.full_alarm = Some(true);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);
    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert_eq!(report.action, Some(Action::SafetyStop { log_event: true }));
}

#[test]
fn unreadable_alarm_blocks_start() {
    let mut plant = MockPlant::new();
    plant.level = Some(10.0);
    plant.full_alarm = None;
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);

    for k in 1..=3 {
        assert_eq!(sup.scan_cycle(secs(t0, k), &mut plant, &mut sink).action, None);
    }
    assert_eq!(plant.starts(), 0);

    plant.full_alarm = Some(false);
    assert!(sup.scan_cycle(secs(t0, 4), &mut plant, &mut sink).committed);
    assert_eq!(plant.starts(), 1);
}

#[test]
fn unreadable_alarm_still_allows_stop() {
    let mut plant = MockPlant::running();
    plant.level = Some(97.0);
    plant.full_alarm = None;
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);
    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert_eq!(report.action, Some(Action::Stop { level: 97.0 }));
    assert_eq!(sink.count("PUMP_STOP"), 1);
}

// ── Command failures ──────────────────────────────────────────

#[test]
fn failed_start_is_retried_without_event() {
    let mut plant = MockPlant::new();
    plant.level = Some(30.0);
    plant.fail_commands = true;
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);

    let r1 = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert!(matches!(r1.action, Some(Action::Start { .. })));
    assert!(!r1.committed);
    assert_eq!(sup.mode(), PumpMode::CommandedOff);
    assert_eq!(sink.count("PUMP_START"), 0);

    sup.scan_cycle(secs(t0, 2), &mut plant, &mut sink);
    assert_eq!(plant.starts(), 2);
    assert_eq!(sink.count("PUMP_START"), 0);

    plant.fail_commands = false;
    let r3 = sup.scan_cycle(secs(t0, 3), &mut plant, &mut sink);
    assert!(r3.committed);
    assert_eq!(sup.mode(), PumpMode::CommandedOn);
    assert_eq!(sink.count("PUMP_START"), 1);
}

#[test]
fn level_write_failure_is_not_fatal() {
    let mut plant = MockPlant::new();
    plant.fail_level_write = true;
    let (mut sup, mut sink, t0) = boot(&simulated(30.0), &mut plant);
    let report = sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert!(report.level.is_available());
    assert!(report.committed);
    assert_eq!(plant.calls, vec![PlantCall::PulseStart]);
}

// ── Simulated plant ───────────────────────────────────────────

#[test]
fn simulated_level_is_pushed_every_cycle() {
    let mut plant = MockPlant::new();
    let (mut sup, mut sink, t0) = boot(&simulated(80.0), &mut plant);
    for k in 1..=3 {
        sup.scan_cycle(secs(t0, k), &mut plant, &mut sink);
    }
    let writes = plant
        .calls
        .iter()
        .filter(|c| matches!(c, PlantCall::WriteLevel(_)))
        .count();
    assert_eq!(writes, 3);
    assert_eq!(plant.last_written_level(), sup.model_level());
}

#[test]
fn sensed_mode_never_writes_level() {
    let mut plant = MockPlant::new();
    plant.level = Some(30.0);
    let (mut sup, mut sink, t0) = boot(&sensed(), &mut plant);
    sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    assert!(plant.last_written_level().is_none());
    let sim = sink.kinds().into_iter().find_map(|k| match k {
        EventKind::PumpStart { sim, .. } => Some(*sim),
        _ => None,
    });
    assert_eq!(sim, Some(None));
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn stop_emits_final_event_and_flushes() {
    let mut plant = MockPlant::new();
    let (mut sup, mut sink, t0) = boot(&simulated(80.0), &mut plant);
    sup.scan_cycle(secs(t0, 1), &mut plant, &mut sink);
    sup.stop(&mut sink, "test");

    assert_eq!(sink.tags(), vec!["SUPERVISOR_START", "SUPERVISOR_STOP"]);
    assert_eq!(sink.flushes, 1);
    assert_eq!(sup.cycle_count(), 1);
    assert!(sink.records[1].to_string().ends_with("INFO SUPERVISOR_STOP (test)"));
}
