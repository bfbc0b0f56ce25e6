//! Hysteresis gate that decides which readings reach the host.
//!
//! One stored baseline per channel, nothing else — this is deliberately not a
//! filter with memory. A completion event or connect-time refresh bypasses
//! the thresholds via the `force_*` methods, which also reset the baseline.

use crate::config::TelemetryCfg;
use crate::fixed_point::{abs_diff_i32_u32, celsius_to_cc};

#[derive(Debug)]
pub struct TelemetryGate {
    position_threshold: u32,
    temperature_threshold_cc: u32,
    last_position: Option<i32>,
    last_temperature_cc: Option<i32>,
}

impl TelemetryGate {
    pub fn new(cfg: &TelemetryCfg) -> Self {
        Self {
            position_threshold: cfg.position_threshold_ticks,
            // The threshold itself is quantized once, so the comparison below
            // is pure integer math.
            temperature_threshold_cc: celsius_to_cc(cfg.temperature_threshold_c).max(1) as u32,
            last_position: None,
            last_temperature_cc: None,
        }
    }

    /// Offer a position reading; returns true (and commits the baseline) when
    /// it moved strictly more than the threshold away from the last published
    /// value. A channel with no baseline yet always publishes.
    pub fn offer_position(&mut self, ticks: i32) -> bool {
        let publish = match self.last_position {
            None => true,
            Some(last) => abs_diff_i32_u32(ticks, last) > self.position_threshold,
        };
        if publish {
            self.last_position = Some(ticks);
        }
        publish
    }

    /// Offer a temperature in centi-degrees; publishes when the change is at
    /// least the threshold (note: >=, unlike the position channel).
    pub fn offer_temperature_cc(&mut self, cc: i32) -> bool {
        let publish = match self.last_temperature_cc {
            None => true,
            Some(last) => abs_diff_i32_u32(cc, last) >= self.temperature_threshold_cc,
        };
        if publish {
            self.last_temperature_cc = Some(cc);
        }
        publish
    }

    /// Commit a position baseline unconditionally.
    pub fn force_position(&mut self, ticks: i32) {
        self.last_position = Some(ticks);
    }

    /// Commit a temperature baseline unconditionally.
    pub fn force_temperature_cc(&mut self, cc: i32) {
        self.last_temperature_cc = Some(cc);
    }

    pub fn last_position(&self) -> Option<i32> {
        self.last_position
    }

    pub fn last_temperature_cc(&self) -> Option<i32> {
        self.last_temperature_cc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> TelemetryGate {
        TelemetryGate::new(&TelemetryCfg::default())
    }

    #[test]
    fn first_reading_always_publishes() {
        let mut g = gate();
        assert!(g.offer_position(42));
        assert!(g.offer_temperature_cc(1250));
    }

    #[test]
    fn position_threshold_is_strict() {
        let mut g = gate();
        g.force_position(100);
        assert!(!g.offer_position(104), "|4| <= 5 suppressed");
        assert!(!g.offer_position(105), "|5| == 5 still suppressed");
        assert!(g.offer_position(106), "|6| > 5 publishes");
        assert_eq!(g.last_position(), Some(106));
    }

    #[test]
    fn temperature_threshold_is_inclusive() {
        let mut g = gate();
        g.force_temperature_cc(1000);
        assert!(!g.offer_temperature_cc(1009));
        assert!(g.offer_temperature_cc(1010), "exactly 0.1 C publishes");
    }

    #[test]
    fn suppressed_offers_do_not_move_the_baseline() {
        let mut g = gate();
        g.force_position(100);
        // Creep by 4 ticks at a time; baseline stays at 100 until one offer
        // exceeds the threshold relative to it.
        assert!(!g.offer_position(104));
        assert!(!g.offer_position(103));
        assert!(g.offer_position(106));
    }
}
