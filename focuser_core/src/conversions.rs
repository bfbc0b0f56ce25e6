//! Conversions from the TOML schema (`focuser_config`) into the runtime
//! config structs the core consumes.

use crate::config::{PollCfg, TelemetryCfg};

impl From<&focuser_config::Poll> for PollCfg {
    fn from(p: &focuser_config::Poll) -> Self {
        Self {
            period_ms: p.period_ms,
            move_timeout_ms: p.move_timeout_ms,
        }
    }
}

impl From<&focuser_config::Telemetry> for TelemetryCfg {
    fn from(t: &focuser_config::Telemetry) -> Self {
        Self {
            position_threshold_ticks: t.position_threshold_ticks,
            temperature_threshold_c: t.temperature_threshold_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_poll_schema_onto_runtime_cfg() {
        let schema = focuser_config::load_toml("[poll]\nperiod_ms = 250\nmove_timeout_ms = 2000\n")
            .expect("parse");
        let cfg = PollCfg::from(&schema.poll);
        assert_eq!(cfg.period_ms, 250);
        assert_eq!(cfg.move_timeout_ms, 2000);
    }

    #[test]
    fn maps_telemetry_schema_onto_runtime_cfg() {
        let schema = focuser_config::load_toml(
            "[telemetry]\nposition_threshold_ticks = 3\ntemperature_threshold_c = 0.2\n",
        )
        .expect("parse");
        let cfg = TelemetryCfg::from(&schema.telemetry);
        assert_eq!(cfg.position_threshold_ticks, 3);
        assert!((cfg.temperature_threshold_c - 0.2).abs() < 1e-6);
    }
}
