use focuser_core::mocks::{MockFocuser, MockState};
use focuser_core::{Focuser, Update};

fn builder_for(state: MockState) -> (Focuser, std::sync::Arc<std::sync::Mutex<MockState>>) {
    let driver = MockFocuser::with_state(state);
    let hw = driver.handle();
    let focuser = Focuser::builder()
        .with_driver(driver)
        .with_name("bench unit")
        .build()
        .expect("build focuser");
    (focuser, hw)
}

#[test]
fn connect_adopts_hardware_travel_bound() {
    let (mut focuser, _hw) = builder_for(MockState {
        max_step: 50_000,
        ..MockState::default()
    });
    assert_eq!(focuser.max_position(), 0);

    focuser.connect().expect("connect");
    assert_eq!(focuser.max_position(), 50_000);
}

#[test]
fn reconnect_never_trusts_the_cached_bound() {
    let (mut focuser, hw) = builder_for(MockState {
        max_step: 50_000,
        ..MockState::default()
    });
    focuser.connect().expect("connect");
    focuser.disconnect().expect("disconnect");

    // Physical configuration changed between sessions.
    hw.lock().unwrap().max_step = 30_000;
    focuser.connect().expect("reconnect");
    assert_eq!(focuser.max_position(), 30_000);
}

#[test]
fn connect_publishes_an_unconditional_baseline() {
    let (mut focuser, hw) = builder_for(MockState {
        position: 1234,
        temperature_c: 7.25,
        reversed: true,
        ..MockState::default()
    });

    let updates = focuser.connect().expect("connect");
    assert!(updates.contains(&Update::Position { ticks: 1234 }));
    assert!(updates.contains(&Update::Reversed { enabled: true }));
    assert!(
        updates.iter().any(
            |u| matches!(u, Update::Temperature { celsius } if (*celsius - 7.25).abs() < 1e-4)
        )
    );

    // The refresh set the gate baselines: an immediate poll with unchanged
    // hardware values stays quiet.
    let _ = hw;
    assert!(focuser.poll().is_empty());
}

#[test]
fn connect_skips_temperature_when_probe_reports_sentinel() {
    let (mut focuser, _hw) = builder_for(MockState {
        temperature_c: -273.0,
        ..MockState::default()
    });

    let updates = focuser.connect().expect("connect");
    assert!(
        !updates
            .iter()
            .any(|u| matches!(u, Update::Temperature { .. }))
    );
}

#[test]
fn failed_open_leaves_device_disconnected() {
    let (mut focuser, _hw) = builder_for(MockState {
        fail_open: true,
        ..MockState::default()
    });

    assert!(focuser.connect().is_err());
    assert!(!focuser.is_connected());
}

#[test]
fn disconnect_freezes_telemetry_at_last_values() {
    let (mut focuser, hw) = builder_for(MockState {
        position: 4321,
        temperature_c: 3.5,
        ..MockState::default()
    });
    focuser.connect().expect("connect");
    focuser.disconnect().expect("disconnect");

    // Hardware keeps living its own life; our view is frozen.
    hw.lock().unwrap().position = 0;
    let snap = focuser.snapshot();
    assert!(!snap.connected);
    assert_eq!(snap.position, 4321);
    assert!((snap.temperature_c - 3.5).abs() < 1e-4);
}

#[test]
fn connect_survives_a_failed_auxiliary_read() {
    // Position read fails during the eager refresh: connect still succeeds
    // and the remaining channels are published.
    let (mut focuser, _hw) = builder_for(MockState {
        fail_position: true,
        temperature_c: 9.0,
        ..MockState::default()
    });

    let updates = focuser.connect().expect("connect");
    assert!(focuser.is_connected());
    assert!(!updates.iter().any(|u| matches!(u, Update::Position { .. })));
    assert!(updates.iter().any(|u| matches!(u, Update::Reversed { .. })));
}
