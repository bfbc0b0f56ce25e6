//! Maps `Box<dyn Error>` from trait boundaries to typed `FocuserError`.
//!
//! `FocuserDriver` uses `Box<dyn Error + Send + Sync>` for maximum
//! flexibility; this module converts those to our typed error enum, with an
//! optional feature-gated path for `focuser_hardware::HwError` downcasting.

use crate::error::FocuserError;

/// Map a trait-boundary error to a typed `FocuserError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> FocuserError {
    // Feature-gated: try to downcast to HwError for precise mapping
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<focuser_hardware::error::HwError>() {
            return match hw {
                focuser_hardware::error::HwError::NotConnected => FocuserError::NotConnected,
                focuser_hardware::error::HwError::Command(code) => {
                    FocuserError::CommandFailed(*code)
                }
                other => FocuserError::Hardware(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("not open") || s.to_lowercase().contains("not connected") {
        FocuserError::NotConnected
    } else {
        FocuserError::Hardware(s)
    }
}
