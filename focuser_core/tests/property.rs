use focuser_core::mocks::{MockFocuser, MockState};
use focuser_core::{Focuser, TelemetryCfg, TelemetryGate};
use focuser_traits::FocusDirection;
use proptest::prelude::*;

proptest! {
    // For all relative moves the commanded target lands in [0, max], even
    // when the observed position is itself outside the commanded range.
    #[test]
    fn relative_targets_stay_within_travel(
        max_step in 1i32..200_000,
        position in -10_000i32..400_000,
        delta in proptest::num::u32::ANY,
        inward in proptest::bool::ANY,
    ) {
        let driver = MockFocuser::with_state(MockState {
            position,
            max_step,
            ..MockState::default()
        });
        let hw = driver.handle();
        let mut focuser = Focuser::builder()
            .with_driver(driver)
            .build()
            .unwrap();
        focuser.connect().unwrap();

        let direction = if inward { FocusDirection::Inward } else { FocusDirection::Outward };
        focuser.move_relative(direction, delta).unwrap();

        let target = hw.lock().unwrap().last_move_target.unwrap();
        prop_assert!((0..=max_step).contains(&target),
            "target {target} outside [0, {max_step}] (position {position}, delta {delta})");
    }

    // The gate publishes a position exactly when it moved strictly more than
    // the threshold from the last published baseline.
    #[test]
    fn gate_matches_reference_hysteresis(
        readings in proptest::collection::vec(-100_000i32..100_000, 1..200),
        threshold in 0u32..50,
    ) {
        let mut gate = TelemetryGate::new(&TelemetryCfg {
            position_threshold_ticks: threshold,
            temperature_threshold_c: 0.1,
        });

        let mut baseline: Option<i32> = None;
        for r in readings {
            let expected = match baseline {
                None => true,
                Some(b) => (i64::from(r) - i64::from(b)).unsigned_abs() > u64::from(threshold),
            };
            let published = gate.offer_position(r);
            prop_assert_eq!(published, expected);
            if expected {
                baseline = Some(r);
            }
            prop_assert_eq!(gate.last_position(), baseline);
        }
    }
}
