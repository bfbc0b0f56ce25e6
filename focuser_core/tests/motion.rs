use focuser_core::mocks::{MockFocuser, MockState};
use focuser_core::{Focuser, MotionStatus};
use focuser_traits::FocusDirection;

fn connected(state: MockState) -> (Focuser, std::sync::Arc<std::sync::Mutex<MockState>>) {
    let driver = MockFocuser::with_state(state);
    let handle = driver.handle();
    let mut focuser = Focuser::builder()
        .with_driver(driver)
        .build()
        .expect("build focuser");
    focuser.connect().expect("connect");
    (focuser, handle)
}

#[test]
fn absolute_move_is_fire_and_forget() {
    let (mut focuser, hw) = connected(MockState {
        position: 100,
        max_step: 1000,
        ..MockState::default()
    });

    focuser.move_absolute(800).expect("accepted");
    assert_eq!(hw.lock().unwrap().last_move_target, Some(800));
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
    assert_eq!(focuser.relative_status(), MotionStatus::Idle);
    assert_eq!(focuser.target_position(), 800);
    // Position is still the last observed one; nothing waited for motion.
    assert_eq!(focuser.position(), 100);
}

#[test]
fn absolute_move_skips_range_validation() {
    // Out-of-range targets go straight to hardware, which is trusted to
    // reject or clamp them.
    let (mut focuser, hw) = connected(MockState {
        max_step: 1000,
        ..MockState::default()
    });
    focuser.move_absolute(999_999).expect("accepted");
    assert_eq!(hw.lock().unwrap().last_move_target, Some(999_999));
}

#[test]
fn rejected_absolute_move_raises_alert() {
    let (mut focuser, hw) = connected(MockState::default());
    hw.lock().unwrap().fail_command = true;

    assert!(focuser.move_absolute(500).is_err());
    assert_eq!(focuser.absolute_status(), MotionStatus::Alert);
    assert_eq!(focuser.relative_status(), MotionStatus::Idle);
}

#[test]
fn relative_move_clamps_inward_underflow_to_zero() {
    // max=1000, current=10, inward by 50 -> commanded target 0, not -40.
    let (mut focuser, hw) = connected(MockState {
        position: 10,
        max_step: 1000,
        ..MockState::default()
    });

    focuser
        .move_relative(FocusDirection::Inward, 50)
        .expect("accepted");
    assert_eq!(hw.lock().unwrap().last_move_target, Some(0));
}

#[test]
fn relative_move_clamps_outward_to_max() {
    let (mut focuser, hw) = connected(MockState {
        position: 990,
        max_step: 1000,
        ..MockState::default()
    });

    focuser
        .move_relative(FocusDirection::Outward, 500)
        .expect("accepted");
    assert_eq!(hw.lock().unwrap().last_move_target, Some(1000));
}

#[test]
fn relative_move_records_requested_delta_and_marks_both_groups() {
    let (mut focuser, hw) = connected(MockState {
        position: 10,
        max_step: 1000,
        ..MockState::default()
    });

    focuser
        .move_relative(FocusDirection::Inward, 50)
        .expect("accepted");
    // The requested delta is kept for display, not the clamped travel of 10.
    assert_eq!(focuser.last_relative_delta(), 50);
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
    assert_eq!(focuser.relative_status(), MotionStatus::Busy);
    assert_eq!(hw.lock().unwrap().last_move_target, Some(0));
}

#[test]
fn rejected_relative_move_alerts_relative_group_only() {
    let (mut focuser, hw) = connected(MockState::default());
    hw.lock().unwrap().fail_command = true;

    assert!(focuser.move_relative(FocusDirection::Outward, 10).is_err());
    assert_eq!(focuser.relative_status(), MotionStatus::Alert);
    assert_eq!(focuser.absolute_status(), MotionStatus::Idle);
}

#[test]
fn sync_relabels_without_touching_motion_status() {
    let (mut focuser, hw) = connected(MockState {
        position: 500,
        ..MockState::default()
    });

    focuser.sync(2000).expect("sync ok");
    let hw = hw.lock().unwrap();
    assert_eq!(hw.sync_target, Some(2000));
    assert_eq!(hw.last_move_target, None, "sync must not command motion");
    drop(hw);
    assert_eq!(focuser.absolute_status(), MotionStatus::Idle);
}

#[test]
fn abort_is_advisory_and_leaves_status_busy() {
    let (mut focuser, hw) = connected(MockState::default());
    focuser.move_absolute(300).expect("accepted");

    focuser.abort().expect("stop issued");
    assert_eq!(hw.lock().unwrap().stop_count, 1);
    // Only the next poll observing "not moving" settles the status.
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
}

#[test]
fn failed_abort_reports_error_and_changes_nothing() {
    let (mut focuser, hw) = connected(MockState::default());
    focuser.move_absolute(300).expect("accepted");
    hw.lock().unwrap().fail_stop = true;

    assert!(focuser.abort().is_err());
    assert_eq!(focuser.absolute_status(), MotionStatus::Busy);
}

#[test]
fn set_max_position_adopts_new_bound_on_success_only() {
    let (mut focuser, hw) = connected(MockState {
        max_step: 1000,
        ..MockState::default()
    });
    assert_eq!(focuser.max_position(), 1000);

    focuser.set_max_position(2000).expect("ok");
    assert_eq!(focuser.max_position(), 2000);
    assert_eq!(hw.lock().unwrap().max_step, 2000);

    hw.lock().unwrap().fail_command = true;
    assert!(focuser.set_max_position(5).is_err());
    assert_eq!(focuser.max_position(), 2000);
}

#[test]
fn reverse_write_needs_separate_read_back() {
    let (mut focuser, hw) = connected(MockState::default());

    focuser.set_reverse(true).expect("write ok");
    // Local view is unchanged until the hardware answer is re-read.
    assert!(!focuser.reversed());
    assert!(hw.lock().unwrap().reversed);

    assert!(focuser.refresh_reverse().expect("read ok"));
    assert!(focuser.reversed());
}
