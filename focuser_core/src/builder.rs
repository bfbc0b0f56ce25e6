//! Type-state builder for `Focuser` and generic `build_focuser` constructor.
//!
//! The builder enforces at compile time that a driver is provided before
//! `build()` is available. `try_build()` is always available for dynamic
//! checks.

use std::marker::PhantomData;
use std::sync::Arc;

use focuser_traits::FocuserDriver;
use focuser_traits::clock::{Clock, MonotonicClock};

use crate::config::{PollCfg, TelemetryCfg};
use crate::core::{FocuserCore, new_core};
use crate::error::{BuildError, Result};

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) focuser that preserves a concrete type for
/// registries and worker threads via composition.
pub struct Focuser {
    pub(crate) inner: FocuserCore<Box<dyn FocuserDriver + Send>>,
}

impl core::fmt::Debug for Focuser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Focuser {
    /// Start building a Focuser.
    pub fn builder() -> FocuserBuilder<Missing> {
        FocuserBuilder::default()
    }

    pub fn connect(&mut self) -> Result<Vec<crate::status::Update>> {
        self.inner.connect()
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.inner.disconnect()
    }

    pub fn move_absolute(&mut self, target: i32) -> Result<()> {
        self.inner.move_absolute(target)
    }

    pub fn move_relative(
        &mut self,
        direction: focuser_traits::FocusDirection,
        delta: u32,
    ) -> Result<()> {
        self.inner.move_relative(direction, delta)
    }

    pub fn sync(&mut self, ticks: i32) -> Result<()> {
        self.inner.sync(ticks)
    }

    pub fn set_reverse(&mut self, enabled: bool) -> Result<()> {
        self.inner.set_reverse(enabled)
    }

    pub fn refresh_reverse(&mut self) -> Result<bool> {
        self.inner.refresh_reverse()
    }

    pub fn abort(&mut self) -> Result<()> {
        self.inner.abort()
    }

    pub fn set_max_position(&mut self, ticks: i32) -> Result<()> {
        self.inner.set_max_position(ticks)
    }

    /// One tick of the poll loop; see `FocuserCore::poll`.
    pub fn poll(&mut self) -> Vec<crate::status::Update> {
        self.inner.poll()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    pub fn position(&self) -> i32 {
        self.inner.position()
    }

    pub fn max_position(&self) -> i32 {
        self.inner.max_position()
    }

    pub fn temperature_celsius(&self) -> f32 {
        self.inner.temperature_celsius()
    }

    pub fn reversed(&self) -> bool {
        self.inner.reversed()
    }

    pub fn absolute_status(&self) -> crate::status::MotionStatus {
        self.inner.absolute_status()
    }

    pub fn relative_status(&self) -> crate::status::MotionStatus {
        self.inner.relative_status()
    }

    pub fn target_position(&self) -> i32 {
        self.inner.target_position()
    }

    pub fn last_relative_delta(&self) -> u32 {
        self.inner.last_relative_delta()
    }

    pub fn poll_cfg(&self) -> &crate::config::PollCfg {
        self.inner.poll_cfg()
    }

    pub fn snapshot(&self) -> crate::status::Snapshot {
        self.inner.snapshot()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Focuser`. All fields are validated on `build()`.
pub struct FocuserBuilder<D> {
    driver: Option<Box<dyn FocuserDriver + Send>>,
    name: Option<String>,
    poll: Option<PollCfg>,
    telemetry: Option<TelemetryCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _d: PhantomData<D>,
}

impl Default for FocuserBuilder<Missing> {
    fn default() -> Self {
        Self {
            driver: None,
            name: None,
            poll: None,
            telemetry: None,
            clock: None,
            _d: PhantomData,
        }
    }
}

/// Validate configuration and construct a `FocuserCore`.
///
/// This is the single source of truth for validation and construction,
/// used by both `FocuserBuilder::try_build()` and `build_focuser()`.
fn validate_and_build<D: FocuserDriver>(
    driver: D,
    name: String,
    poll: PollCfg,
    telemetry: TelemetryCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<FocuserCore<D>> {
    if name.trim().is_empty() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "device name must not be empty",
        )));
    }
    if poll.period_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "poll period must be >= 1 ms",
        )));
    }
    if poll.move_timeout_ms > 0 && poll.move_timeout_ms < poll.period_ms {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "move timeout must be 0 or >= poll period",
        )));
    }
    if !telemetry.temperature_threshold_c.is_finite() || telemetry.temperature_threshold_c <= 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "temperature threshold must be finite and > 0",
        )));
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };

    Ok(new_core(driver, name, poll, &telemetry, clock))
}

impl<D> FocuserBuilder<D> {
    /// Fallible build available in any type-state; returns a detailed error
    /// for missing pieces.
    pub fn try_build(self) -> Result<Focuser> {
        let driver = self
            .driver
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDriver))?;

        let inner = validate_and_build(
            driver,
            self.name.unwrap_or_else(|| "focuser".to_string()),
            self.poll.unwrap_or_default(),
            self.telemetry.unwrap_or_default(),
            self.clock,
        )?;

        Ok(Focuser { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<D> FocuserBuilder<D> {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn with_poll(mut self, poll: PollCfg) -> Self {
        self.poll = Some(poll);
        self
    }
    pub fn with_telemetry(mut self, telemetry: TelemetryCfg) -> Self {
        self.telemetry = Some(telemetry);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock`
    /// when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setter that advances type-state
impl FocuserBuilder<Missing> {
    pub fn with_driver(self, driver: impl FocuserDriver + Send + 'static) -> FocuserBuilder<Set> {
        FocuserBuilder {
            driver: Some(Box::new(driver)),
            name: self.name,
            poll: self.poll,
            telemetry: self.telemetry,
            clock: self.clock,
            _d: PhantomData,
        }
    }
}

impl FocuserBuilder<Set> {
    /// Validate and build the Focuser. Only available once a driver is set.
    pub fn build(self) -> Result<Focuser> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type FocuserG<D> = FocuserCore<D>;

/// Build a generic, statically-dispatched `FocuserG` from a concrete driver.
///
/// Delegates to the shared `validate_and_build` — no duplicated validation
/// logic.
pub fn build_focuser<D>(
    driver: D,
    name: impl Into<String>,
    poll: PollCfg,
    telemetry: TelemetryCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<FocuserG<D>>
where
    D: FocuserDriver + 'static,
{
    validate_and_build(driver, name.into(), poll, telemetry, clock)
}
