//! Runtime configuration for the focuser state machine.
//!
//! These are the structs `FocuserCore` actually consumes. They are separate
//! from the TOML-deserialized schema in `focuser_config`; see `conversions`.

/// Poll loop configuration.
#[derive(Debug, Clone)]
pub struct PollCfg {
    /// Tick period in milliseconds. Completion detection and telemetry both
    /// ride on this cadence, so it trades responsiveness against update
    /// volume.
    pub period_ms: u64,
    /// Watchdog for an in-flight move (ms). While a command group is Busy and
    /// hardware keeps reporting "moving" past this long, both groups flip to
    /// Alert. 0 disables the watchdog and trusts the hardware to settle.
    pub move_timeout_ms: u64,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self {
            period_ms: 500,
            move_timeout_ms: 0,
        }
    }
}

/// Telemetry publish thresholds.
#[derive(Debug, Clone)]
pub struct TelemetryCfg {
    /// Position updates within this many ticks of the last published value
    /// are suppressed (strict: publish when |delta| > threshold). Absorbs
    /// stepper micro-jitter while still surfacing progress mid-move.
    pub position_threshold_ticks: u32,
    /// Temperature updates smaller than this (°C) are suppressed
    /// (publish when |delta| >= threshold).
    pub temperature_threshold_c: f32,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            position_threshold_ticks: 5,
            temperature_threshold_c: 0.1,
        }
    }
}
