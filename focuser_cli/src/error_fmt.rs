//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and
/// fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use focuser_core::error::{BuildError, FocuserError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingDriver => {
                "What happened: No driver was provided to the focuser engine.\nLikely causes: Hardware failed to initialize or was not wired into the builder.\nHow to fix: Ensure a driver is created successfully and passed via with_driver(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(fe) = err.downcast_ref::<FocuserError>() {
        return match fe {
            FocuserError::NotConnected => {
                "What happened: The device is not connected.\nLikely causes: Connect failed earlier, or the unit was unplugged.\nHow to fix: Check the USB link and retry; see logs for the open error.".to_string()
            }
            FocuserError::CommandFailed(code) => format!(
                "What happened: The hardware rejected a command (code {code}).\nLikely causes: Out-of-range value or a transport hiccup.\nHow to fix: Retry the command; check the target against the max position."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map error classes to stable exit codes; generic errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use focuser_core::error::{BuildError, FocuserError};
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if let Some(fe) = err.downcast_ref::<FocuserError>() {
        return match fe {
            FocuserError::NotConnected => 3,
            FocuserError::CommandFailed(_) => 4,
            FocuserError::Hardware(_) => 5,
            FocuserError::State(_) => 6,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use focuser_core::error::FocuserError;
    use serde_json::json;

    let reason = match err.downcast_ref::<FocuserError>() {
        Some(FocuserError::NotConnected) => "NotConnected",
        Some(FocuserError::CommandFailed(_)) => "CommandFailed",
        Some(FocuserError::Hardware(_)) => "Hardware",
        Some(FocuserError::State(_)) => "State",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
