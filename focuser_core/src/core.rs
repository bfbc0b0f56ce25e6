//! The motion/poll state machine (`FocuserCore`).
//!
//! Command issuance is fire-and-forget: every mutating operation is a single
//! hardware call that returns immediately, because the hardware offers no
//! blocking-completion primitive. Completion detection lives entirely in
//! `poll()`, which is also the only place motion status ever settles back to
//! `Idle` — the displayed state always reflects hardware-confirmed truth.

use std::sync::Arc;
use std::time::Instant;

use eyre::WrapErr;
use focuser_traits::clock::Clock;
use focuser_traits::{FocusDirection, FocuserDriver, TEMPERATURE_INVALID_C};

use crate::config::{PollCfg, TelemetryCfg};
use crate::error::Result;
use crate::fixed_point::{cc_to_celsius, celsius_to_cc};
use crate::hw_error::map_hw_error;
use crate::status::{MotionStatus, Snapshot, Update};
use crate::telemetry::TelemetryGate;

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct FocuserCore<D: FocuserDriver> {
    pub(crate) driver: D,
    pub(crate) name: String,
    pub(crate) poll: PollCfg,
    pub(crate) gate: TelemetryGate,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,

    pub(crate) connected: bool,
    pub(crate) max_position: i32,
    pub(crate) current_position: i32,
    pub(crate) current_temperature_cc: i32,
    pub(crate) reversed: bool,
    pub(crate) abs_status: MotionStatus,
    pub(crate) rel_status: MotionStatus,
    pub(crate) target_position: i32,
    pub(crate) last_relative_delta: u32,
    pub(crate) busy_since_ms: Option<u64>,
}

impl<D: FocuserDriver> core::fmt::Debug for FocuserCore<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FocuserCore")
            .field("name", &self.name)
            .field("connected", &self.connected)
            .field("position", &self.current_position)
            .field("max_position", &self.max_position)
            .field("abs_status", &self.abs_status)
            .field("rel_status", &self.rel_status)
            .finish()
    }
}

impl<D: FocuserDriver> FocuserCore<D> {
    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Open the hardware handle and take a fresh baseline.
    ///
    /// The travel bound is re-read from hardware on every connect — a cached
    /// bound is never trusted, since physical configuration may have changed
    /// between sessions. Position, reverse state, and (when a probe is
    /// present) temperature are published unconditionally so the host has a
    /// consistent view before the first poll tick.
    pub fn connect(&mut self) -> Result<Vec<Update>> {
        self.driver
            .open()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("opening device")?;
        self.connected = true;
        self.abs_status = MotionStatus::Idle;
        self.rel_status = MotionStatus::Idle;
        self.busy_since_ms = None;

        match self.driver.max_step() {
            Ok(max) => self.max_position = max,
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "failed to read max step")
            }
        }

        let mut updates = Vec::new();
        match self.driver.position() {
            Ok(pos) => {
                self.current_position = pos;
                self.target_position = pos;
                self.gate.force_position(pos);
                updates.push(Update::Position { ticks: pos });
            }
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "failed to read position")
            }
        }
        match self.driver.reverse() {
            Ok(enabled) => {
                self.reversed = enabled;
                updates.push(Update::Reversed { enabled });
            }
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "failed to read reverse state")
            }
        }
        match self.driver.temperature() {
            Ok(t) if t != TEMPERATURE_INVALID_C => {
                let cc = celsius_to_cc(t);
                self.current_temperature_cc = cc;
                self.gate.force_temperature_cc(cc);
                updates.push(Update::Temperature {
                    celsius: cc_to_celsius(cc),
                });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "failed to read temperature")
            }
        }

        tracing::info!(name = %self.name, max_position = self.max_position, "focuser connected");
        Ok(updates)
    }

    /// Close the hardware handle. Telemetry fields keep their last values
    /// until a future connect overwrites them.
    pub fn disconnect(&mut self) -> Result<()> {
        self.driver
            .close()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("closing device")?;
        self.connected = false;
        tracing::info!(name = %self.name, "focuser disconnected");
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Command an absolute move and return immediately.
    ///
    /// No range validation happens here: the hardware is trusted to reject or
    /// clamp out-of-range targets. Completion is detected by `poll()`.
    pub fn move_absolute(&mut self, target: i32) -> Result<()> {
        if let Err(e) = self.driver.move_to(target) {
            self.abs_status = MotionStatus::Alert;
            let err = map_hw_error(&*e);
            tracing::error!(name = %self.name, target, error = %err, "absolute move rejected");
            return Err(eyre::Report::new(err)).wrap_err("absolute move");
        }
        self.target_position = target;
        self.abs_status = MotionStatus::Busy;
        self.busy_since_ms = Some(self.clock.ms_since(self.epoch));
        tracing::debug!(name = %self.name, target, "absolute move issued");
        Ok(())
    }

    /// Command a relative move by translating it into a clamped absolute one.
    ///
    /// The target is computed in signed 64-bit space so a delta larger than
    /// the current position cannot underflow, then clamped into
    /// `[0, max_position]`. The *requested* delta is recorded for display,
    /// not the clamped travel.
    pub fn move_relative(&mut self, direction: FocusDirection, delta: u32) -> Result<()> {
        let current = i64::from(self.current_position);
        let new_position = match direction {
            FocusDirection::Inward => current - i64::from(delta),
            FocusDirection::Outward => current + i64::from(delta),
        };
        let target = new_position.clamp(0, i64::from(self.max_position.max(0))) as i32;

        if let Err(e) = self.driver.move_to(target) {
            self.rel_status = MotionStatus::Alert;
            let err = map_hw_error(&*e);
            tracing::error!(name = %self.name, ?direction, delta, target, error = %err, "relative move rejected");
            return Err(eyre::Report::new(err)).wrap_err("relative move");
        }
        self.target_position = target;
        self.last_relative_delta = delta;
        self.abs_status = MotionStatus::Busy;
        self.rel_status = MotionStatus::Busy;
        self.busy_since_ms = Some(self.clock.ms_since(self.epoch));
        tracing::debug!(name = %self.name, ?direction, delta, target, "relative move issued");
        Ok(())
    }

    /// Relabel the present physical position as `ticks` without motion.
    /// Motion status is untouched; the next poll reads the new labels.
    pub fn sync(&mut self, ticks: i32) -> Result<()> {
        self.driver
            .reset_position(ticks)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("sync")?;
        tracing::info!(name = %self.name, ticks, "position synced");
        Ok(())
    }

    /// Write the direction-inversion flag.
    ///
    /// This is half of a two-step protocol: hardware is the source of truth,
    /// so the new state only becomes visible through `refresh_reverse`.
    pub fn set_reverse(&mut self, enabled: bool) -> Result<()> {
        self.driver
            .set_reverse(enabled)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("set reverse")?;
        tracing::debug!(name = %self.name, enabled, "reverse flag written");
        Ok(())
    }

    /// Read the direction-inversion flag back from hardware and adopt it.
    pub fn refresh_reverse(&mut self) -> Result<bool> {
        let enabled = self
            .driver
            .reverse()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("read reverse")?;
        self.reversed = enabled;
        Ok(enabled)
    }

    /// Issue a stop. Advisory only: motion status stays as-is until the next
    /// poll tick observes "not moving", so the displayed state is never an
    /// optimistic local guess.
    pub fn abort(&mut self) -> Result<()> {
        self.driver
            .stop()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("abort")?;
        tracing::info!(name = %self.name, "abort issued");
        Ok(())
    }

    /// Forward a new travel bound to hardware; adopt it locally on success.
    pub fn set_max_position(&mut self, ticks: i32) -> Result<()> {
        self.driver
            .set_max_step(ticks)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("set max position")?;
        self.max_position = ticks;
        tracing::info!(name = %self.name, ticks, "max position updated");
        Ok(())
    }

    // ── Poll tick ────────────────────────────────────────────────────────────

    /// One tick of the poll loop: read telemetry, gate it, advance completion
    /// detection. Returns the updates the host should see this tick.
    ///
    /// Read failures are non-fatal — each is logged, the stale value is kept,
    /// and the tick continues with its next step. While disconnected this is
    /// a no-op (no hardware I/O), but callers keep ticking so a reconnect is
    /// picked up by the same mechanism.
    pub fn poll(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        if !self.connected {
            return updates;
        }

        match self.driver.position() {
            Ok(pos) => {
                self.current_position = pos;
                if self.gate.offer_position(pos) {
                    updates.push(Update::Position { ticks: pos });
                }
            }
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "position read failed, keeping stale value")
            }
        }

        match self.driver.temperature() {
            // The probe sentinel means "no valid sample", not a reading.
            Ok(t) if t != TEMPERATURE_INVALID_C => {
                let cc = celsius_to_cc(t);
                self.current_temperature_cc = cc;
                if self.gate.offer_temperature_cc(cc) {
                    updates.push(Update::Temperature {
                        celsius: cc_to_celsius(cc),
                    });
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "temperature read failed, keeping stale value")
            }
        }

        if self.abs_status == MotionStatus::Busy || self.rel_status == MotionStatus::Busy {
            match self.driver.is_moving() {
                Ok(false) => {
                    self.abs_status = MotionStatus::Idle;
                    self.rel_status = MotionStatus::Idle;
                    self.busy_since_ms = None;
                    // A definitive completion event is always worth
                    // reporting, so it bypasses the gate and resets its
                    // baseline to the just-read position.
                    self.gate.force_position(self.current_position);
                    updates.push(Update::Settled {
                        ticks: self.current_position,
                    });
                    tracing::info!(name = %self.name, position = self.current_position, "focuser reached requested position");
                }
                Ok(true) => {
                    if self.poll.move_timeout_ms > 0
                        && let Some(since) = self.busy_since_ms
                    {
                        let elapsed = self.clock.ms_since(self.epoch).saturating_sub(since);
                        if elapsed >= self.poll.move_timeout_ms {
                            self.abs_status = MotionStatus::Alert;
                            self.rel_status = MotionStatus::Alert;
                            self.busy_since_ms = None;
                            tracing::warn!(name = %self.name, elapsed_ms = elapsed, "move watchdog tripped, still moving");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(name = %self.name, error = %map_hw_error(&*e), "motion query failed")
                }
            }
        }

        updates
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Last observed absolute position. Reported as-is even when outside
    /// `[0, max_position]` — hardware truth wins over the commanded range.
    pub fn position(&self) -> i32 {
        self.current_position
    }

    pub fn max_position(&self) -> i32 {
        self.max_position
    }

    pub fn temperature_celsius(&self) -> f32 {
        cc_to_celsius(self.current_temperature_cc)
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn absolute_status(&self) -> MotionStatus {
        self.abs_status
    }

    pub fn relative_status(&self) -> MotionStatus {
        self.rel_status
    }

    /// Target of the most recently issued move.
    pub fn target_position(&self) -> i32 {
        self.target_position
    }

    /// Requested (pre-clamp) delta of the most recent relative move.
    pub fn last_relative_delta(&self) -> u32 {
        self.last_relative_delta
    }

    pub fn poll_cfg(&self) -> &PollCfg {
        &self.poll
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            connected: self.connected,
            position: self.current_position,
            max_position: self.max_position,
            temperature_c: self.temperature_celsius(),
            reversed: self.reversed,
            absolute: self.abs_status,
            relative: self.rel_status,
        }
    }
}

// Crate-private constructor used by the builder's validate-and-build path.
pub(crate) fn new_core<D: FocuserDriver>(
    driver: D,
    name: String,
    poll: PollCfg,
    telemetry: &TelemetryCfg,
    clock: Arc<dyn Clock + Send + Sync>,
) -> FocuserCore<D> {
    let epoch = clock.now();
    FocuserCore {
        driver,
        name,
        poll,
        gate: TelemetryGate::new(telemetry),
        clock,
        epoch,
        connected: false,
        max_position: 0,
        current_position: 0,
        current_temperature_cc: 0,
        reversed: false,
        abs_status: MotionStatus::Idle,
        rel_status: MotionStatus::Idle,
        target_position: 0,
        last_relative_delta: 0,
        busy_since_ms: None,
    }
}
