//! Motion status flags and host-facing update events.

/// State of one command group (absolute or relative motion).
///
/// `Busy` is entered when a move command is accepted and left only when a
/// poll tick observes the hardware report "not moving" — never optimistically
/// by the command issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionStatus {
    #[default]
    Idle,
    Busy,
    Alert,
}

/// Telemetry event surfaced to the supervising host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    /// Position changed by more than the publish threshold.
    Position { ticks: i32 },
    /// Temperature changed by at least the publish threshold.
    Temperature { celsius: f32 },
    /// Direction-inversion flag, re-read from hardware.
    Reversed { enabled: bool },
    /// A commanded move finished; always published regardless of threshold.
    Settled { ticks: i32 },
}

/// Point-in-time view of one device for the host's property surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub connected: bool,
    pub position: i32,
    pub max_position: i32,
    pub temperature_c: f32,
    pub reversed: bool,
    pub absolute: MotionStatus,
    pub relative: MotionStatus,
}
