pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Temperature reading the hardware uses to signal "no valid sample yet".
/// Readings equal to this value must not be published.
pub const TEMPERATURE_INVALID_C: f32 = -273.0;

/// Direction of a relative focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    /// Toward the telescope (decreasing tick count).
    Inward,
    /// Away from the telescope (increasing tick count).
    Outward,
}

/// Synchronous facade over one physical focuser unit.
///
/// Every call issues exactly one transport command and returns promptly with
/// either the output value or the transport's failure. None of these calls
/// wait for motion to finish; `is_moving` is the only completion signal the
/// hardware offers.
pub trait FocuserDriver {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn temperature(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
    fn position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;
    fn max_step(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;
    fn set_max_step(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn reverse(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
    fn set_reverse(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn is_moving(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    fn move_to(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Relabel the present physical position as `ticks` without moving.
    fn reset_position(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: FocuserDriver + ?Sized> FocuserDriver for Box<T> {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).open()
    }
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).close()
    }
    fn temperature(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).temperature()
    }
    fn position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).position()
    }
    fn max_step(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).max_step()
    }
    fn set_max_step(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_max_step(ticks)
    }
    fn reverse(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).reverse()
    }
    fn set_reverse(
        &mut self,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_reverse(enabled)
    }
    fn is_moving(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).is_moving()
    }
    fn move_to(&mut self, ticks: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).move_to(ticks)
    }
    fn reset_position(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).reset_position(ticks)
    }
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).stop()
    }
}
