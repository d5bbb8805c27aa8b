//! Dispatcher scenarios against mock adapters.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tankctl::app::commands::Mode;
use tankctl::app::events::{AppEvent, Machine};
use tankctl::app::service::AppService;
use tankctl::config::SystemConfig;
use tankctl::fsm::tables::{continuous, single_shot};
use tankctl::level::LevelRegister;
use tankctl::sensors::ScriptedSampler;

use super::mock_hw::{MockHardware, RecordingDisplay, RecordingSink, ScriptedModes};

fn fast_config(initial_level: f32) -> SystemConfig {
    SystemConfig {
        initial_level,
        step_delay_ms: 0,
        ..SystemConfig::default()
    }
}

fn build(config: SystemConfig, readings: &[f32]) -> (AppService, RecordingDisplay) {
    let display = RecordingDisplay::new();
    let level = Arc::new(LevelRegister::new(
        &config,
        display.clone(),
        ScriptedSampler::new(readings.iter().copied(), 0.0),
    ));
    (AppService::new(config, level).unwrap(), display)
}

fn run(app: &mut AppService, mode: Mode, hw: &mut MockHardware, sink: &mut RecordingSink, n: u32) {
    for _ in 0..n {
        app.tick(mode, hw, sink);
    }
}

#[test]
fn single_shot_measures_once_and_settles() {
    let (mut app, display) = build(fast_config(8.0), &[0.0]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    // Idle -> Waiting, five ticks of settle time, then the measurement.
    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 10);

    assert_eq!(app.state(Machine::SingleShot), single_shot::EVALUATE);
    assert_eq!(sink.state_changes(), vec![(0, 1), (1, 2)]);
    assert_eq!(app.level().snapshot().unwrap(), 4.0);
    assert!(display.contains("Level = 4"));
    assert_eq!(hw.reads, 10);
}

#[test]
fn single_shot_empty_tank_is_filled() {
    // A -1 reading on an empty tank clamps to 0, so evaluation sees empty.
    let (mut app, display) = build(fast_config(0.0), &[-1.0]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 10);

    assert_eq!(app.state(Machine::SingleShot), single_shot::FILLING);
    assert_eq!(sink.state_changes(), vec![(0, 1), (1, 2), (2, 4)]);
    assert!(display.contains("Tank empty"));
    assert!(display.contains("Filling tank"));
    // The full check nudged the level just below the top.
    let v = app.level().snapshot().unwrap();
    assert!(v < 10.0 && v > 9.99, "level {v}");
}

#[test]
fn emergency_stabilizes_then_releases() {
    let (mut app, _) = build(fast_config(5.0), &[]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 2);
    hw.press_emergency(true);
    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 1);
    hw.press_emergency(false);

    assert_eq!(app.state(Machine::SingleShot), single_shot::STABILIZING);
    assert!(hw.led_on());
    assert!(!app.context().measurement_enabled);

    let ticks = app.config().stabilization_ticks();
    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, ticks);
    assert!(!hw.led_on());
    assert!(app.context().measurement_enabled);
    // No declared destination: the machine parks in stabilization.
    assert_eq!(app.state(Machine::SingleShot), single_shot::STABILIZING);
}

#[test]
fn automatic_mode_runs_continuous_loop() {
    let (mut app, _) = build(fast_config(5.0), &[0.0, 0.0, 0.0]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    // One start tick, then a measurement every six ticks
    // (five to expire the timer, one to re-arm it).
    run(&mut app, Mode::Automatic, &mut hw, &mut sink, 1 + 3 * 6);

    let retriggers = sink
        .state_changes()
        .into_iter()
        .filter(|&(_, to)| to == continuous::RETRIGGER.0)
        .count();
    assert_eq!(retriggers, 3);
    assert_eq!(app.level().snapshot().unwrap(), 0.625);
    assert_eq!(app.state(Machine::SingleShot), single_shot::IDLE);
}

#[test]
fn stop_button_ends_continuous_measurement() {
    let (mut app, display) = build(fast_config(6.0), &[0.0]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 1);
    hw.press_stop(true);
    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 1);
    hw.press_stop(false);
    assert_eq!(app.state(Machine::Continuous), continuous::STOPPED);

    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 20);
    assert_eq!(app.state(Machine::Continuous), continuous::STOPPED);
    assert_eq!(app.level().snapshot().unwrap(), 3.0);
    assert_eq!(display.lines(), vec!["Level = 3".to_owned()]);
}

#[test]
fn single_shot_resumes_after_continuous_final_reading() {
    let (mut app, _) = build(fast_config(6.0), &[0.0]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 1);
    assert_eq!(app.state(Machine::SingleShot), single_shot::WAITING);

    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 1);
    hw.press_stop(true);
    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 1);
    hw.press_stop(false);
    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 10);
    assert_eq!(app.state(Machine::Continuous), continuous::STOPPED);
    assert_eq!(app.level().snapshot().unwrap(), 3.0);

    // The measure timer is still expired, so the waiting machine evaluates
    // on its next update.
    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 1);
    assert_eq!(app.state(Machine::SingleShot), single_shot::EVALUATE);
}

#[test]
fn machines_keep_separate_states_across_mode_switches() {
    let (mut app, _) = build(fast_config(5.0), &[]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 1);
    run(&mut app, Mode::ManualContinuous, &mut hw, &mut sink, 1);
    run(&mut app, Mode::ManualSingleShot, &mut hw, &mut sink, 1);

    assert_eq!(app.state(Machine::SingleShot), single_shot::WAITING);
    assert_eq!(app.state(Machine::Continuous), continuous::MEASURING);

    let modes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ModeChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        modes,
        vec![Mode::ManualSingleShot, Mode::ManualContinuous, Mode::ManualSingleShot]
    );
}

#[test]
fn cycles_without_mode_do_not_advance_timers() {
    let (mut app, _) = build(fast_config(5.0), &[]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut modes = ScriptedModes::new(vec![None, None, Some(Mode::ManualSingleShot)]);

    assert!(!app.run_cycle(&mut modes, &mut hw, &mut sink));
    assert!(!app.run_cycle(&mut modes, &mut hw, &mut sink));
    assert_eq!(hw.reads, 0);
    assert!(app.run_cycle(&mut modes, &mut hw, &mut sink));
    assert!(app.run_cycle(&mut modes, &mut hw, &mut sink));

    let t = &app.context().timers.measure;
    assert_eq!(t.remaining(), t.duration() - 2);
}

#[test]
fn lock_timeout_surfaces_as_fault_event() {
    let config = SystemConfig {
        initial_level: 10.0,
        step_delay_ms: 30,
        lock_timeout_ms: Some(10),
        ..SystemConfig::default()
    };
    let (mut app, _) = build(config, &[]);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    // Idle -> Measuring touches no level state.
    run(&mut app, Mode::Automatic, &mut hw, &mut sink, 1);

    let level = Arc::clone(app.level());
    let drainer = thread::spawn(move || level.drain());
    thread::sleep(Duration::from_millis(50));

    // Both level guards time out and count as "not met".
    run(&mut app, Mode::Automatic, &mut hw, &mut sink, 1);
    assert_eq!(app.state(Machine::Continuous), continuous::MEASURING);
    assert_eq!(sink.lock_faults(), vec![2]);
    assert_eq!(app.level().lock_faults(), 2);

    assert_eq!(drainer.join().unwrap(), Ok(10));
}
