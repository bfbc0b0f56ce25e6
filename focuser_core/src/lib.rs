#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core focuser motion control (hardware-agnostic).
//!
//! This crate provides the motion/poll state machine for a stepper-based
//! optical focuser. All hardware interactions go through the
//! `focuser_traits::FocuserDriver` facade.
//!
//! ## Architecture
//!
//! - **Commands**: fire-and-forget absolute/relative moves, sync, reverse,
//!   abort, max-travel (`core` module); issuing never waits for motion.
//! - **Poll loop**: completion detection and telemetry on a fixed tick
//!   (`FocuserCore::poll`, driven by the `service` worker).
//! - **Telemetry gate**: per-channel hysteresis thresholds (`telemetry`).
//! - **Registry**: dynamically sized name → device map (`registry`).
//! - **Status**: `Idle | Busy | Alert` per command group (`status`).
//!
//! ## Fixed-Point Arithmetic
//!
//! Temperature is handled in **centi-degrees Celsius** (1 cC = 0.01 °C) as
//! `i32`, so the publish threshold compares exactly. Positions are already
//! integer hardware ticks.

// Module declarations
pub mod builder;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod fixed_point;
pub mod hw_error;
pub mod mocks;
pub mod registry;
pub mod service;
pub mod status;
pub mod telemetry;

pub use crate::core::FocuserCore;
pub use builder::{Focuser, FocuserBuilder, FocuserG, build_focuser};
pub use config::{PollCfg, TelemetryCfg};
pub use error::{BuildError, FocuserError, Result};
pub use registry::FocuserRegistry;
pub use service::FocuserHandle;
pub use status::{MotionStatus, Snapshot, Update};
pub use telemetry::TelemetryGate;
