//! Outbound application events.
//!
//! The [`LiftService`](super::service::LiftService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — the firmware just logs,
//! but a telemetry channel could subscribe without touching the core.

use crate::control::lift::MotionMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// The lift's motion mode changed.
    ModeChanged { from: MotionMode, to: MotionMode },

    /// An automatic move reached its target (within tolerance).
    TargetReached { position_mm: f32 },
}
