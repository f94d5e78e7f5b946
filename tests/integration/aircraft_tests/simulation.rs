use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use sixdof::{
    components::ControlId,
    resources::{EnvironmentSnapshot, SimulationConfig},
    simulation::{ListenerError, LogEntry, RunState, SimError, SimulationHandle, StopReason},
    start_loop,
};

use crate::common::{
    assert_contiguous_steps, assert_state_valid, create_navion, navion_cruise, trimmed,
    wait_for_condition,
};

const WAIT: Duration = Duration::from_secs(10);

fn trimmed_handle(config: SimulationConfig) -> SimulationHandle {
    let aircraft = create_navion();
    let trim = trimmed(&aircraft, &navion_cruise());
    SimulationHandle::new(aircraft, trim.state, trim.controls, config).unwrap()
}

#[test]
fn test_analysis_run_completes() {
    let mut sim = trimmed_handle(SimulationConfig::analysis(2.0));
    sim.start().unwrap();

    let reason = sim.wait_until_stopped(WAIT).unwrap();
    assert_eq!(reason, StopReason::Completed);
    assert_eq!(sim.run_state(), RunState::Stopped);

    let log = sim.log();
    assert_eq!(log.len(), 200);
    assert_eq!(log[0].step, 0);
    assert_contiguous_steps(&log);
    for entry in &log {
        assert_state_valid(&entry.state);
    }
    assert!((log[199].time - 2.0).abs() < 1e-9);
    assert!((log[199].derived.altitude - 5_000.0).abs() < 1.0);
}

#[test]
fn test_stop_is_prompt_and_final() {
    let aircraft = create_navion();
    let trim = trimmed(&aircraft, &navion_cruise());
    let mut sim = start_loop(aircraft, trim.state, trim.controls, SimulationConfig::default())
        .unwrap();
    assert_eq!(sim.run_state(), RunState::Running);
    assert!(wait_for_condition(WAIT, || sim.log_len() >= 10));

    let asked = Instant::now();
    let reason = sim.stop().unwrap();
    assert!(asked.elapsed() < Duration::from_millis(200), "stop took {:?}", asked.elapsed());
    assert_eq!(reason, StopReason::Requested);

    let log = sim.log();
    assert_eq!(log[0].step, 0);
    assert_contiguous_steps(&log);

    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(sim.log_len(), log.len());
    assert!(matches!(sim.stop(), Err(SimError::AlreadyStopped)));
    assert!(matches!(sim.start(), Err(SimError::AlreadyStopped)));
}

#[test]
fn test_control_snapshot_switches_atomically() {
    let mut sim = trimmed_handle(SimulationConfig::default());
    let before = (*sim.controls()).clone();
    let after = before
        .clone()
        .with(ControlId::Throttle, 0.9)
        .with(ControlId::Elevator, 0.05);

    sim.start().unwrap();
    assert!(wait_for_condition(WAIT, || sim.log_len() >= 20));
    sim.push_controls(after.clone());
    assert_eq!(*sim.controls(), after);
    assert!(wait_for_condition(WAIT, || {
        sim.latest().map_or(false, |e| e.controls == after)
    }));
    sim.stop().unwrap();

    let log = sim.log();
    assert!(log
        .iter()
        .all(|e| e.controls == before || e.controls == after));
    let switches = log
        .windows(2)
        .filter(|pair| pair[0].controls != pair[1].controls)
        .count();
    assert_eq!(switches, 1);
}

#[test]
fn test_failing_listener_does_not_stop_the_loop() {
    let mut sim = trimmed_handle(SimulationConfig::analysis(0.5));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_listener = seen.clone();
    let listener = move |entry: &LogEntry| -> Result<(), ListenerError> {
        seen_by_listener.lock().unwrap().push(entry.step);
        if entry.step % 2 == 1 {
            return Err(ListenerError::new("odd step"));
        }
        Ok(())
    };
    let handle = sim.subscribe(listener).unwrap();

    sim.start().unwrap();
    assert_eq!(sim.wait_until_stopped(WAIT).unwrap(), StopReason::Completed);
    assert!(wait_for_condition(WAIT, || handle.error_count() == 25));
    assert!(handle.join());

    assert_eq!(sim.log_len(), 50);
    assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<u64>>());
    assert_eq!(sim.dropped_notifications(), 0);
}

#[test]
fn test_channel_subscriber_sees_every_step() {
    let mut sim = trimmed_handle(SimulationConfig::analysis(0.3));
    let receiver = sim.subscribe_channel();
    sim.start().unwrap();
    sim.wait_until_stopped(WAIT).unwrap();

    // The loop closes subscriptions on exit, so the iterator ends.
    let steps: Vec<u64> = receiver.iter().map(|e| e.step).collect();
    assert_eq!(steps, (0..30).collect::<Vec<u64>>());
    assert!(sim.subscribe_channel().recv().is_err());
}

#[test]
fn test_capped_log_keeps_newest_entries() {
    let config = SimulationConfig {
        max_log_entries: Some(20),
        ..SimulationConfig::analysis(1.0)
    };
    let mut sim = trimmed_handle(config);
    sim.start().unwrap();
    sim.wait_until_stopped(WAIT).unwrap();

    let steps: Vec<u64> = sim.log().iter().map(|e| e.step).collect();
    assert_eq!(steps, (80..100).collect::<Vec<u64>>());
}

#[test]
fn test_log_export_and_clear() {
    let mut sim = trimmed_handle(SimulationConfig::analysis(0.1));
    sim.start().unwrap();
    sim.wait_until_stopped(WAIT).unwrap();

    let json: serde_json::Value = serde_json::from_str(&sim.log_json().unwrap()).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[9]["step"], 9);
    assert!(entries[0]["derived"]["true_airspeed"].as_f64().unwrap() > 250.0);

    sim.clear_log();
    assert_eq!(sim.log_len(), 0);
    assert!(sim.latest().is_none());
}

#[test]
fn test_non_finite_step_halts_with_fault() {
    let mut sim = trimmed_handle(SimulationConfig::analysis(1.0));
    sim.push_environment(EnvironmentSnapshot::calm().with_density_override(1e305));
    sim.start().unwrap();

    let reason = sim.wait_until_stopped(WAIT).unwrap();
    assert!(
        matches!(reason, StopReason::Fault { step: 0, .. }),
        "stopped with {:?}",
        reason
    );
    assert_eq!(sim.run_state(), RunState::Stopped);
    assert_eq!(sim.stop_reason(), Some(reason));
    assert!(sim.log().iter().all(|e| e.state.is_finite()));
    assert_eq!(sim.log_len(), 0);
}
