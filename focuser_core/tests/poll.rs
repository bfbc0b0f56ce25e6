use std::time::Duration;

use focuser_core::mocks::{MockFocuser, MockState};
use focuser_core::{Focuser, MotionStatus, PollCfg, Update};
use focuser_traits::clock::TestClock;

fn build(
    state: MockState,
    poll: PollCfg,
) -> (
    Focuser,
    std::sync::Arc<std::sync::Mutex<MockState>>,
    TestClock,
) {
    let driver = MockFocuser::with_state(state);
    let hw = driver.handle();
    let clock = TestClock::new();
    let mut focuser = Focuser::builder()
        .with_driver(driver)
        .with_poll(poll)
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("build focuser");
    focuser.connect().expect("connect");
    (focuser, hw, clock)
}

fn positions(updates: &[Update]) -> Vec<i32> {
    updates
        .iter()
        .filter_map(|u| match u {
            Update::Position { ticks } => Some(*ticks),
            _ => None,
        })
        .collect()
}

#[test]
fn position_publishes_only_past_threshold() {
    // Baseline 100 from the connect-time refresh.
    let (mut focuser, hw, _clock) = build(
        MockState {
            position: 100,
            ..MockState::default()
        },
        PollCfg::default(),
    );

    hw.lock().unwrap().position = 104;
    assert!(positions(&focuser.poll()).is_empty(), "|4| <= 5 suppressed");
    assert_eq!(focuser.position(), 104, "stale-free: value still tracked");

    hw.lock().unwrap().position = 106;
    assert_eq!(positions(&focuser.poll()), vec![106], "|6| > 5 publishes");

    // Baseline moved to 106; 104 is now within threshold again.
    hw.lock().unwrap().position = 104;
    assert!(positions(&focuser.poll()).is_empty());
}

#[test]
fn identical_in_threshold_reads_publish_nothing() {
    let (mut focuser, hw, _clock) = build(
        MockState {
            position: 100,
            ..MockState::default()
        },
        PollCfg::default(),
    );

    hw.lock().unwrap().position = 104;
    let first = focuser.poll();
    let second = focuser.poll();
    assert!(positions(&first).is_empty());
    assert!(positions(&second).is_empty());
}

#[test]
fn temperature_threshold_is_inclusive() {
    let (mut focuser, hw, _clock) = build(
        MockState {
            temperature_c: 10.0,
            ..MockState::default()
        },
        PollCfg::default(),
    );

    hw.lock().unwrap().temperature_c = 10.05;
    assert!(
        !focuser
            .poll()
            .iter()
            .any(|u| matches!(u, Update::Temperature { .. }))
    );

    hw.lock().unwrap().temperature_c = 10.10;
    let updates = focuser.poll();
    assert!(
        updates.iter().any(
            |u| matches!(u, Update::Temperature { celsius } if (*celsius - 10.1).abs() < 1e-4)
        )
    );
}

#[test]
fn sentinel_temperature_is_not_published() {
    let (mut focuser, hw, _clock) = build(
        MockState {
            temperature_c: 8.0,
            ..MockState::default()
        },
        PollCfg::default(),
    );

    hw.lock().unwrap().temperature_c = -273.0;
    let updates = focuser.poll();
    assert!(
        !updates
            .iter()
            .any(|u| matches!(u, Update::Temperature { .. })),
        "sentinel means no update"
    );
    // The last real reading is retained.
    assert!((focuser.temperature_celsius() - 8.0).abs() < 1e-4);
}

#[test]
fn settle_transitions_to_idle_and_forces_publish() {
    let (mut focuser, hw, _clock) = build(
        MockState {
            position: 100,
            max_step: 1000,
            ..MockState::default()
        },
        PollCfg::default(),
    );

    focuser.move_absolute(103).expect("accepted");
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);

    // Hardware finishes; the observed position moved only 3 ticks — well
    // inside the threshold — but completion always publishes.
    {
        let mut hw = hw.lock().unwrap();
        hw.position = 103;
        hw.moving = false;
    }
    let updates = focuser.poll();
    assert!(updates.contains(&Update::Settled { ticks: 103 }));
    assert_eq!(focuser.absolute_status(), MotionStatus::Idle);
    assert_eq!(focuser.relative_status(), MotionStatus::Idle);

    // Settling reset the baseline to 103: a 4-tick drift stays quiet, a
    // 6-tick drift does not.
    hw.lock().unwrap().position = 107;
    assert!(positions(&focuser.poll()).is_empty());
    hw.lock().unwrap().position = 109;
    assert_eq!(positions(&focuser.poll()), vec![109]);
}

#[test]
fn still_moving_keeps_busy() {
    let (mut focuser, hw, _clock) = build(MockState::default(), PollCfg::default());
    focuser.move_absolute(500).expect("accepted");
    hw.lock().unwrap().moving = true;

    focuser.poll();
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
}

#[test]
fn failed_reads_are_skipped_not_fatal() {
    let (mut focuser, hw, _clock) = build(
        MockState {
            position: 100,
            temperature_c: 10.0,
            ..MockState::default()
        },
        PollCfg::default(),
    );
    focuser.move_absolute(500).expect("accepted");

    {
        let mut hw = hw.lock().unwrap();
        hw.fail_position = true;
        hw.fail_is_moving = true;
        hw.position = 400;
        hw.temperature_c = 11.0;
    }
    let updates = focuser.poll();
    // Position read failed: stale value kept, no position update; the tick
    // still proceeded to the temperature step.
    assert_eq!(focuser.position(), 100);
    assert!(positions(&updates).is_empty());
    assert!(
        updates
            .iter()
            .any(|u| matches!(u, Update::Temperature { .. }))
    );
    // Failed motion query neither advances nor regresses status.
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
}

#[test]
fn disconnected_poll_touches_no_hardware() {
    let (mut focuser, hw, _clock) = build(MockState::default(), PollCfg::default());
    focuser.disconnect().expect("disconnect");

    let reads_before = hw.lock().unwrap().position_reads;
    assert!(focuser.poll().is_empty());
    assert_eq!(hw.lock().unwrap().position_reads, reads_before);
}

#[test]
fn move_watchdog_disabled_by_default() {
    let (mut focuser, hw, clock) = build(MockState::default(), PollCfg::default());
    focuser.move_absolute(500).expect("accepted");
    hw.lock().unwrap().moving = true;

    // An hour of "still moving" is tolerated forever with the default config.
    clock.advance(Duration::from_secs(3600));
    focuser.poll();
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
}

#[test]
fn move_watchdog_alerts_when_enabled() {
    let (mut focuser, hw, clock) = build(
        MockState::default(),
        PollCfg {
            period_ms: 500,
            move_timeout_ms: 2_000,
        },
    );
    focuser.move_absolute(500).expect("accepted");
    hw.lock().unwrap().moving = true;

    clock.advance(Duration::from_millis(1_000));
    focuser.poll();
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);

    clock.advance(Duration::from_millis(1_500));
    focuser.poll();
    assert_eq!(focuser.absolute_status(), MotionStatus::Alert);
    assert_eq!(focuser.relative_status(), MotionStatus::Alert);
}
