#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the focuser controller.
//!
//! `Config` and sub-structs are deserialized from TOML and validated before
//! they are mapped onto the core's runtime structs.
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Device {
    /// Human-readable device name; used as the registry key and in logs.
    pub name: String,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            name: "focuser".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Poll {
    /// Poll tick period in milliseconds. Also accepts alias "poll_ms".
    #[serde(alias = "poll_ms")]
    pub period_ms: u64,
    /// Abort watchdog for an in-flight move (ms). 0 disables; the hardware
    /// is then trusted to eventually report "not moving".
    pub move_timeout_ms: u64,
}

impl Default for Poll {
    fn default() -> Self {
        Self {
            period_ms: 500,
            move_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    /// Suppress position updates within this many ticks of the last one.
    pub position_threshold_ticks: u32,
    /// Suppress temperature updates smaller than this many degrees Celsius.
    pub temperature_threshold_c: f32,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            position_threshold_ticks: 5,
            temperature_threshold_c: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Simulator {
    /// Travel range of the simulated unit, in ticks.
    pub max_step: i32,
    /// Simulated travel rate in ticks per second.
    pub speed_ticks_per_sec: u32,
    /// Starting position in ticks.
    pub start_position: i32,
    /// Reported probe temperature in Celsius.
    pub temperature_c: f32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            max_step: 60_000,
            speed_ticks_per_sec: 5_000,
            start_position: 0,
            temperature_c: 12.5,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: Device,
    pub poll: Poll,
    pub telemetry: Telemetry,
    pub logging: Logging,
    pub simulator: Simulator,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.device.name.trim().is_empty() {
            eyre::bail!("device.name must not be empty");
        }

        // Poll
        if self.poll.period_ms == 0 {
            eyre::bail!("poll.period_ms must be >= 1");
        }
        if self.poll.period_ms > 60_000 {
            eyre::bail!("poll.period_ms is unreasonably large (>60s)");
        }
        if self.poll.move_timeout_ms > 0 && self.poll.move_timeout_ms < self.poll.period_ms {
            eyre::bail!("poll.move_timeout_ms must be 0 or >= poll.period_ms");
        }

        // Telemetry
        if !self.telemetry.temperature_threshold_c.is_finite()
            || self.telemetry.temperature_threshold_c <= 0.0
        {
            eyre::bail!("telemetry.temperature_threshold_c must be finite and > 0");
        }

        // Simulator
        if self.simulator.max_step <= 0 {
            eyre::bail!("simulator.max_step must be > 0");
        }
        if self.simulator.speed_ticks_per_sec == 0 {
            eyre::bail!("simulator.speed_ticks_per_sec must be > 0");
        }
        if self.simulator.start_position < 0
            || self.simulator.start_position > self.simulator.max_step
        {
            eyre::bail!("simulator.start_position must be within [0, simulator.max_step]");
        }

        Ok(())
    }
}
