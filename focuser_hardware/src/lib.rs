#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Driver implementations for the focuser stack.
//!
//! The vendor USB transport is an external collaborator; what lives here is a
//! simulated unit with a time-based motion model, good enough to exercise the
//! full command/poll cycle from the CLI and from tests.

pub mod error;

use std::time::Instant;

use error::HwError;
use focuser_traits::{FocuserDriver, TEMPERATURE_INVALID_C};

/// Simulated focuser: travels toward the last commanded target at a fixed
/// tick rate, measured against wall-clock time at each query.
pub struct SimulatedFocuser {
    open: bool,
    position: f64,
    target: i32,
    max_step: i32,
    reversed: bool,
    speed_tps: f64,
    temperature_c: f32,
    last_advance: Instant,
}

impl SimulatedFocuser {
    pub fn new(max_step: i32, speed_ticks_per_sec: u32) -> Self {
        Self {
            open: false,
            position: 0.0,
            target: 0,
            max_step: max_step.max(1),
            reversed: false,
            speed_tps: f64::from(speed_ticks_per_sec.max(1)),
            temperature_c: 12.5,
            last_advance: Instant::now(),
        }
    }

    pub fn with_position(mut self, ticks: i32) -> Self {
        self.position = f64::from(ticks);
        self.target = ticks;
        self
    }

    pub fn with_temperature(mut self, celsius: f32) -> Self {
        self.temperature_c = celsius;
        self
    }

    /// Report the sentinel instead of a real temperature (some units have no
    /// probe attached).
    pub fn without_probe(mut self) -> Self {
        self.temperature_c = TEMPERATURE_INVALID_C;
        self
    }

    fn require_open(&self) -> error::Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(HwError::NotConnected)
        }
    }

    /// Advance the motion model by the wall-clock time since the last query.
    fn advance(&mut self) {
        let dt = self.last_advance.elapsed().as_secs_f64();
        self.last_advance = Instant::now();
        let remaining = f64::from(self.target) - self.position;
        if remaining == 0.0 {
            return;
        }
        let step = self.speed_tps * dt;
        if step >= remaining.abs() {
            self.position = f64::from(self.target);
        } else {
            self.position += step * remaining.signum();
        }
    }
}

impl FocuserDriver for SimulatedFocuser {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.open = true;
        self.last_advance = Instant::now();
        tracing::debug!(max_step = self.max_step, "simulated focuser opened");
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.open = false;
        Ok(())
    }

    fn temperature(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        Ok(self.temperature_c)
    }

    fn position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.advance();
        Ok(self.position.round() as i32)
    }

    fn max_step(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        Ok(self.max_step)
    }

    fn set_max_step(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        if ticks <= 0 {
            return Err(Box::new(HwError::InvalidValue));
        }
        self.max_step = ticks;
        Ok(())
    }

    fn reverse(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        Ok(self.reversed)
    }

    fn set_reverse(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.reversed = enabled;
        Ok(())
    }

    fn is_moving(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.advance();
        Ok(self.position.round() as i32 != self.target)
    }

    fn move_to(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.advance();
        // Real units clamp out-of-range targets rather than rejecting them.
        self.target = ticks.clamp(0, self.max_step);
        tracing::debug!(target = self.target, "simulated move issued");
        Ok(())
    }

    fn reset_position(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.advance();
        self.position = f64::from(ticks);
        self.target = ticks;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.require_open()?;
        self.advance();
        self.target = self.position.round() as i32;
        Ok(())
    }
}
