use std::thread::sleep;
use std::time::Duration;

use focuser_hardware::SimulatedFocuser;
use focuser_traits::{FocuserDriver, TEMPERATURE_INVALID_C};
use rstest::rstest;

#[test]
fn travels_toward_target_and_settles() {
    let mut sim = SimulatedFocuser::new(10_000, 2_000);
    sim.open().unwrap();
    sim.move_to(200).unwrap();
    assert!(sim.is_moving().unwrap());

    // 2000 ticks/s covers 200 ticks in 100ms; leave margin.
    sleep(Duration::from_millis(250));
    assert!(!sim.is_moving().unwrap());
    assert_eq!(sim.position().unwrap(), 200);
}

#[test]
fn stop_freezes_at_current_position() {
    let mut sim = SimulatedFocuser::new(100_000, 1_000);
    sim.open().unwrap();
    sim.move_to(50_000).unwrap();
    sleep(Duration::from_millis(50));
    sim.stop().unwrap();
    let held = sim.position().unwrap();
    assert!(held < 50_000, "should have been stopped mid-travel");
    sleep(Duration::from_millis(50));
    assert_eq!(sim.position().unwrap(), held);
    assert!(!sim.is_moving().unwrap());
}

#[test]
fn reset_position_relabels_without_motion() {
    let mut sim = SimulatedFocuser::new(10_000, 1_000).with_position(400);
    sim.open().unwrap();
    sim.reset_position(0).unwrap();
    assert_eq!(sim.position().unwrap(), 0);
    assert!(!sim.is_moving().unwrap());
}

#[test]
fn probe_less_unit_reports_sentinel() {
    let mut sim = SimulatedFocuser::new(10_000, 1_000).without_probe();
    sim.open().unwrap();
    assert_eq!(sim.temperature().unwrap(), TEMPERATURE_INVALID_C);
}

#[rstest]
#[case(0)]
#[case(-5)]
fn set_max_step_rejects_non_positive(#[case] ticks: i32) {
    let mut sim = SimulatedFocuser::new(10_000, 1_000);
    sim.open().unwrap();
    assert!(sim.set_max_step(ticks).is_err());
    assert_eq!(sim.max_step().unwrap(), 10_000);
}

#[test]
fn reverse_flag_round_trips() {
    let mut sim = SimulatedFocuser::new(10_000, 1_000);
    sim.open().unwrap();
    assert!(!sim.reverse().unwrap());
    sim.set_reverse(true).unwrap();
    assert!(sim.reverse().unwrap());
}
